mod data_atom;
mod error;
mod iq;
mod tree;
mod variable_generator;

pub use data_atom::{AtomPredicate, DataAtom, ProjectionAtom};
pub use error::{IqError, IqResult};
pub use iq::Iq;
pub use tree::{IqTree, OrderComparator};
pub use variable_generator::VariableGenerator;
