mod error;
mod injective_substitution;
mod literal;
mod substitution;
mod term;

pub use error::*;
pub use injective_substitution::InjectiveSubstitution;
pub use literal::{is_xsd_datatype, validate_literal};
pub use substitution::Substitution;
pub use term::*;

// Re-export some oxrdf types.
pub use oxiri::Iri;
pub use oxrdf::vocab;
pub use oxrdf::{
    BlankNode, BlankNodeRef, IriParseError, Literal, LiteralRef, NamedNode, NamedNodeRef,
    Variable, VariableNameParseError, VariableRef,
};

// Re-export the algebra types the translation consumes.
pub use spargebra::term::{
    GroundTerm, GraphNamePattern, NamedNodePattern, QuadPattern, TermPattern, TriplePattern,
};
