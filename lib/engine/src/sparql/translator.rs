use crate::sparql::error::SparqlResult;
use crate::sparql::observer::{TracingObserver, TranslationObserver};
use crate::sparql::options::TranslationOptions;
use crate::sparql::rewriting::{
    collect_pattern_variables, collect_term_pattern_variables, GraphPatternRewriter,
};
use sparql_iq_common::{BlankNodeMode, DatasetClause, ExternalBindings};
use sparql_iq_logical::{AtomPredicate, Iq, IqTree, ProjectionAtom, VariableGenerator};
use sparql_iq_model::{Iri, NamedNodePattern, Substitution, TriplePattern, Variable};
use spargebra::algebra::{GraphPattern, QueryDataset};
use spargebra::Query;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Translates SPARQL queries and updates into [Iq]s.
///
/// Apart from its options, the translator holds no state. Each call uses its own
/// [VariableGenerator], hence a translator can be shared freely.
///
/// # Example
///
/// ```
/// # use sparql_iq_engine::sparql::{QueryTranslator, TranslationOptions};
/// # use sparql_iq_common::ExternalBindings;
/// let query = spargebra::Query::parse("SELECT ?s WHERE { ?s ?p ?o }", None).unwrap();
/// let translator = QueryTranslator::new(TranslationOptions::default());
/// let iq = translator.translate_query(&query, &ExternalBindings::empty()).unwrap();
/// assert_eq!(iq.projection_atom().to_string(), "ans(?s)");
/// ```
#[derive(Clone)]
pub struct QueryTranslator {
    options: TranslationOptions,
    observer: Arc<dyn TranslationObserver>,
}

impl QueryTranslator {
    pub fn new(options: TranslationOptions) -> Self {
        Self {
            options,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the observer that is notified about every translated graph pattern.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn TranslationObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &TranslationOptions {
        &self.options
    }

    /// Returns a translator with the same observer that treats blank nodes according to `mode`.
    #[must_use]
    pub(crate) fn with_blank_node_mode(&self, mode: BlankNodeMode) -> Self {
        Self {
            options: self.options.clone().with_blank_node_mode(mode),
            observer: Arc::clone(&self.observer),
        }
    }

    /// Translates a SPARQL query into an [Iq].
    ///
    /// The `bindings` fix the values of some variables before the query is evaluated. They are
    /// enforced by filters and never substituted into the query.
    pub fn translate_query(&self, query: &Query, bindings: &ExternalBindings) -> SparqlResult<Iq> {
        tracing::debug!(%query, "Translating SPARQL query");
        let iq = match query {
            Query::Select {
                dataset,
                pattern,
                base_iri,
            } => {
                let rewriter =
                    self.create_rewriter(pattern, &[], dataset.as_ref(), base_iri.as_ref(), bindings);
                let result = rewriter.rewrite(pattern)?;
                let variables = select_variables(pattern)
                    .unwrap_or_else(|| result.projected_variables().into_iter().collect());
                create_iq(variables, result.into_tree())?
            }
            Query::Construct {
                template,
                dataset,
                pattern,
                base_iri,
            } => {
                let template_variables = template_variables(template);
                let rewriter = self.create_rewriter(
                    pattern,
                    &template_variables,
                    dataset.as_ref(),
                    base_iri.as_ref(),
                    bindings,
                );
                let result = rewriter.rewrite(pattern)?;
                let projected = result.projected_variables();
                let variables = template_variables
                    .into_iter()
                    .filter(|variable| projected.contains(variable))
                    .collect::<Vec<_>>();
                let result = rewriter.project(result, &variables)?;
                create_iq(variables, result.into_tree())?
            }
            Query::Describe {
                dataset,
                pattern,
                base_iri,
            } => {
                let rewriter =
                    self.create_rewriter(pattern, &[], dataset.as_ref(), base_iri.as_ref(), bindings);
                let result = rewriter.rewrite(pattern)?;
                let variables = result.projected_variables().into_iter().collect();
                create_iq(variables, result.into_tree())?
            }
            Query::Ask {
                dataset,
                pattern,
                base_iri,
            } => {
                let rewriter =
                    self.create_rewriter(pattern, &[], dataset.as_ref(), base_iri.as_ref(), bindings);
                let result = rewriter.rewrite(pattern)?;
                create_iq(Vec::new(), project_away_all_variables(result.into_tree())?)?
            }
        };
        tracing::debug!(%iq, "Translated SPARQL query");
        Ok(iq)
    }

    /// Creates the rewriter for a single translation.
    ///
    /// The variable generator avoids all variables of `pattern`, of `bindings`, and the
    /// `template_variables`.
    pub(crate) fn create_rewriter<'translation>(
        &'translation self,
        pattern: &GraphPattern,
        template_variables: &[Variable],
        dataset: Option<&QueryDataset>,
        base_iri: Option<&'translation Iri<String>>,
        bindings: &'translation ExternalBindings,
    ) -> GraphPatternRewriter<'translation> {
        let mut known_variables = bindings.variables().cloned().collect::<BTreeSet<_>>();
        collect_pattern_variables(pattern, &mut known_variables);
        known_variables.extend(template_variables.iter().cloned());

        let dataset = dataset
            .map(DatasetClause::from)
            .or_else(|| self.options.default_dataset.clone());
        GraphPatternRewriter::new(
            &self.options,
            dataset,
            base_iri,
            bindings,
            self.observer.as_ref(),
            VariableGenerator::new(known_variables),
        )
    }
}

/// Returns the variables of the outermost projection of a `SELECT` in their declared order.
fn select_variables(pattern: &GraphPattern) -> Option<Vec<Variable>> {
    match pattern {
        GraphPattern::Project { variables, .. } => Some(variables.clone()),
        GraphPattern::Slice { inner, .. }
        | GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::OrderBy { inner, .. } => select_variables(inner),
        _ => None,
    }
}

/// Returns the variables of a template in the order of their first occurrence.
fn template_variables(template: &[TriplePattern]) -> Vec<Variable> {
    let mut result = Vec::new();
    for pattern in template {
        let mut pattern_variables = Vec::new();
        let mut single = BTreeSet::new();
        collect_term_pattern_variables(&pattern.subject, &mut single);
        pattern_variables.extend(std::mem::take(&mut single));
        if let NamedNodePattern::Variable(variable) = &pattern.predicate {
            pattern_variables.push(variable.clone());
        }
        collect_term_pattern_variables(&pattern.object, &mut single);
        pattern_variables.extend(single);

        for variable in pattern_variables {
            if !result.contains(&variable) {
                result.push(variable);
            }
        }
    }
    result
}

/// Inserts a construction without projected variables directly below the query modifiers of
/// `tree`. The order of the solutions is irrelevant in this case, so `ORDER BY` is dropped.
fn project_away_all_variables(tree: IqTree) -> SparqlResult<IqTree> {
    Ok(match tree {
        IqTree::Slice {
            offset,
            limit,
            child,
        } => IqTree::slice(
            offset,
            limit,
            project_away_all_variables(Arc::unwrap_or_clone(child))?,
        ),
        IqTree::Distinct { child } => {
            IqTree::distinct(project_away_all_variables(Arc::unwrap_or_clone(child))?)
        }
        IqTree::OrderBy { child, .. } => project_away_all_variables(Arc::unwrap_or_clone(child))?,
        tree => IqTree::construction(BTreeSet::new(), Substitution::empty(), tree)?,
    })
}

pub(crate) fn create_iq(variables: Vec<Variable>, tree: IqTree) -> SparqlResult<Iq> {
    let atom = ProjectionAtom::try_new(AtomPredicate::Answer, variables)?;
    Ok(Iq::try_new(atom, tree)?)
}
