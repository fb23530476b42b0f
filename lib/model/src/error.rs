use crate::{Arity, Literal, Variable};

/// A result of an operation on the IQ term algebra.
pub type ModelResult<T> = Result<T, ModelError>;

/// An error that is raised when a term, a substitution, or a renaming would violate one of its
/// invariants.
///
/// These errors are not caused by users writing queries. If one of them surfaces during a
/// translation, the translator has constructed something that it should not have constructed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A function symbol was applied to the wrong number of arguments.
    #[error("The function symbol {symbol} expects {expected} arguments but {actual} were given")]
    ArityMismatch {
        symbol: String,
        expected: Arity,
        actual: usize,
    },
    /// Two variables of a renaming would be mapped to the same variable.
    #[error("The renaming maps more than one variable to {0}")]
    NonInjectiveRenaming(Variable),
    /// A renaming would introduce a variable that is already in use.
    #[error("The renaming introduces the variable {0} that is already in use")]
    ForbiddenRangeVariable(Variable),
    /// Two substitutions cannot be merged as they define the same variable differently.
    #[error("The substitutions disagree on the definition of {0}")]
    ConflictingDefinitions(Variable),
    /// A literal has a lexical form that is not valid for its datatype.
    #[error("The literal {0} has an invalid lexical form for its datatype")]
    InvalidLexicalForm(Literal),
}
