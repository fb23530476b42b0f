use sparql_iq_logical::IqError;
use sparql_iq_model::ModelError;

/// A result of translating a SPARQL algebra expression.
pub type SparqlResult<T> = Result<T, TranslationError>;

/// An error raised while translating a SPARQL query or update into an IQ.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TranslationError {
    /// The input cannot stem from a valid query, e.g., an `INSERT` that also deletes or an
    /// aggregation whose definitions depend on each other.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// The input uses a SPARQL feature that has no IQ counterpart.
    #[error("Unsupported SPARQL feature: {0}")]
    Unsupported(String),
    /// A tree or term invariant was violated while building the result.
    #[error("An internal error that likely indicates towards a bug in the translator: {0}")]
    Internal(String),
}

impl TranslationError {
    pub fn invalid<T>(cause: impl Into<String>) -> SparqlResult<T> {
        Err(TranslationError::InvalidQuery(cause.into()))
    }

    pub fn unsupported<T>(cause: impl Into<String>) -> SparqlResult<T> {
        Err(TranslationError::Unsupported(cause.into()))
    }

    pub fn internal<T>(cause: impl Into<String>) -> SparqlResult<T> {
        Err(TranslationError::Internal(cause.into()))
    }
}

impl From<IqError> for TranslationError {
    fn from(error: IqError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<ModelError> for TranslationError {
    fn from(error: ModelError) -> Self {
        Self::Internal(error.to_string())
    }
}
