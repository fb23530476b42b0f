//! Translates SPARQL queries and updates, given as [spargebra] algebra, into intermediate queries
//! ([Iq]s) of the `sparql-iq-logical` crate.

pub mod sparql;

pub use sparql::{QueryTranslator, TranslationError, TranslationOptions};
pub use sparql_iq_logical::Iq;
