mod error;
mod observer;
mod options;
mod rewriting;
mod translator;
mod update;

pub use error::{SparqlResult, TranslationError};
pub use observer::{TracingObserver, TranslationObserver};
pub use options::TranslationOptions;
pub use rewriting::{GraphPatternRewriter, TranslationResult};
pub use translator::QueryTranslator;
