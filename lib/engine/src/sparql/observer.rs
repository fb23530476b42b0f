use crate::sparql::error::TranslationError;
use crate::sparql::rewriting::TranslationResult;
use itertools::Itertools;
use spargebra::algebra::GraphPattern;

/// Observes the translation of the individual graph patterns of a query.
///
/// The observer is notified before and after each graph pattern is translated. Nested patterns
/// are reported in the order in which they are translated, i.e., `on_exit` of a child happens
/// before `on_exit` of its parent.
pub trait TranslationObserver: Send + Sync {
    fn on_enter(&self, _pattern: &GraphPattern) {}

    fn on_exit(
        &self,
        _pattern: &GraphPattern,
        _result: Result<&TranslationResult, &TranslationError>,
    ) {
    }
}

/// Reports the translation steps to [tracing].
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl TranslationObserver for TracingObserver {
    fn on_enter(&self, pattern: &GraphPattern) {
        tracing::trace!(kind = pattern_kind(pattern), "Translating graph pattern");
    }

    fn on_exit(
        &self,
        pattern: &GraphPattern,
        result: Result<&TranslationResult, &TranslationError>,
    ) {
        match result {
            Ok(result) => tracing::trace!(
                kind = pattern_kind(pattern),
                projected = %result.tree().projected_variables().iter().join(", "),
                nullable = %result.nullable_variables().iter().join(", "),
                "Translated graph pattern"
            ),
            Err(error) => tracing::debug!(
                kind = pattern_kind(pattern),
                %error,
                "Failed to translate graph pattern"
            ),
        }
    }
}

fn pattern_kind(pattern: &GraphPattern) -> &'static str {
    match pattern {
        GraphPattern::Bgp { .. } => "bgp",
        GraphPattern::Path { .. } => "path",
        GraphPattern::Join { .. } => "join",
        GraphPattern::LeftJoin { .. } => "left_join",
        GraphPattern::Filter { .. } => "filter",
        GraphPattern::Union { .. } => "union",
        GraphPattern::Graph { .. } => "graph",
        GraphPattern::Extend { .. } => "extend",
        GraphPattern::Minus { .. } => "minus",
        GraphPattern::Values { .. } => "values",
        GraphPattern::OrderBy { .. } => "order_by",
        GraphPattern::Project { .. } => "project",
        GraphPattern::Distinct { .. } => "distinct",
        GraphPattern::Reduced { .. } => "reduced",
        GraphPattern::Slice { .. } => "slice",
        GraphPattern::Group { .. } => "group",
        _ => "other",
    }
}
