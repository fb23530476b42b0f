mod expression_rewriter;
mod extend;
mod graph_pattern_rewriter;
mod join;
mod minus;
mod pattern_rewriter;
mod translation_result;
mod union;
mod values;
mod variables;

pub use graph_pattern_rewriter::GraphPatternRewriter;
pub use translation_result::TranslationResult;
pub(crate) use pattern_rewriter::named_node_pattern;
pub(crate) use variables::{collect_pattern_variables, collect_term_pattern_variables};
