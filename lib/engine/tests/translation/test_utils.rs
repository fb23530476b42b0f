use sparql_iq_common::ExternalBindings;
use sparql_iq_engine::sparql::{
    QueryTranslator, TranslationError, TranslationObserver, TranslationOptions, TranslationResult,
};
use sparql_iq_logical::Iq;
use sparql_iq_model::{NamedNode, Variable};
use spargebra::algebra::GraphPattern;
use spargebra::{Query, Update};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

pub fn variables<const N: usize>(names: [&str; N]) -> BTreeSet<Variable> {
    names.into_iter().map(Variable::new_unchecked).collect()
}

pub fn iri(value: &str) -> NamedNode {
    NamedNode::new_unchecked(value)
}

pub fn translate(query: &str) -> Result<Iq, TranslationError> {
    translate_with(query, TranslationOptions::default(), &ExternalBindings::empty())
}

pub fn translate_with(
    query: &str,
    options: TranslationOptions,
    bindings: &ExternalBindings,
) -> Result<Iq, TranslationError> {
    let query = Query::parse(query, None).unwrap();
    QueryTranslator::new(options).translate_query(&query, bindings)
}

pub fn translate_insert(update: &str) -> Result<Vec<Iq>, TranslationError> {
    let update = Update::parse(update, None).unwrap();
    QueryTranslator::new(TranslationOptions::default()).translate_insert(&update)
}

/// Returns the nullable variables of the outermost graph pattern of `query`.
pub fn nullable_variables(query: &str) -> Result<BTreeSet<Variable>, TranslationError> {
    let recorder = Arc::new(RecordingObserver::default());
    let query = Query::parse(query, None).unwrap();
    QueryTranslator::new(TranslationOptions::default())
        .with_observer(Arc::clone(&recorder) as Arc<dyn TranslationObserver>)
        .translate_query(&query, &ExternalBindings::empty())?;
    let nullable = recorder.last_nullable.lock().unwrap().clone();
    Ok(nullable.unwrap_or_default())
}

/// Records the translation steps.
#[derive(Default)]
pub struct RecordingObserver {
    pub entered: Mutex<Vec<String>>,
    pub exited: Mutex<Vec<String>>,
    pub last_nullable: Mutex<Option<BTreeSet<Variable>>>,
}

impl TranslationObserver for RecordingObserver {
    fn on_enter(&self, pattern: &GraphPattern) {
        self.entered.lock().unwrap().push(kind(pattern).to_owned());
    }

    fn on_exit(
        &self,
        pattern: &GraphPattern,
        result: Result<&TranslationResult, &TranslationError>,
    ) {
        self.exited.lock().unwrap().push(kind(pattern).to_owned());
        if let Ok(result) = result {
            *self.last_nullable.lock().unwrap() = Some(result.nullable_variables().clone());
        }
    }
}

fn kind(pattern: &GraphPattern) -> &'static str {
    match pattern {
        GraphPattern::Bgp { .. } => "bgp",
        GraphPattern::Project { .. } => "project",
        GraphPattern::Slice { .. } => "slice",
        GraphPattern::Filter { .. } => "filter",
        _ => "other",
    }
}
