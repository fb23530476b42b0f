use sparql_iq_model::ModelError;

/// A result of building an IQ tree.
pub type IqResult<T> = Result<T, IqError>;

/// An error that is raised if a node of an IQ tree would violate one of its invariants.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum IqError {
    /// A node cannot be created with the given children or parameters.
    #[error("Invalid {node} node: {reason}")]
    InvalidNode { node: &'static str, reason: String },
    /// A data atom has the wrong number or kind of arguments.
    #[error("Invalid data atom: {0}")]
    InvalidAtom(String),
    /// The answer atom of an IQ does not correspond to the variables of its tree.
    #[error("The projection atom {atom} does not match the projected variables {projected}")]
    ProjectionMismatch { atom: String, projected: String },
    /// A term or a renaming of the tree is invalid.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl IqError {
    pub(crate) fn invalid_node<T>(node: &'static str, reason: impl Into<String>) -> IqResult<T> {
        Err(IqError::InvalidNode {
            node,
            reason: reason.into(),
        })
    }
}
