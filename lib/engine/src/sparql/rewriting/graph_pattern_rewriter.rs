use crate::sparql::error::{SparqlResult, TranslationError};
use crate::sparql::observer::TranslationObserver;
use crate::sparql::options::TranslationOptions;
use crate::sparql::rewriting::expression_rewriter::ExpressionRewriter;
use crate::sparql::rewriting::join::SparqlJoinType;
use crate::sparql::rewriting::pattern_rewriter::named_node_pattern;
use crate::sparql::rewriting::TranslationResult;
use sparql_iq_common::{DatasetClause, ExternalBindings};
use sparql_iq_logical::{IqTree, OrderComparator, VariableGenerator};
use sparql_iq_model::{Iri, Substitution, Term, Variable};
use spargebra::algebra::{AggregateExpression, Expression, GraphPattern, OrderExpression};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Translates the graph patterns of a single query or update into IQ trees.
///
/// A rewriter is created per translation. It owns the [VariableGenerator] of the translation, such
/// that every fresh variable is unique within the resulting IQ.
pub struct GraphPatternRewriter<'translation> {
    pub(super) options: &'translation TranslationOptions,
    pub(super) dataset: Option<DatasetClause>,
    pub(super) base_iri: Option<&'translation Iri<String>>,
    pub(super) bindings: &'translation ExternalBindings,
    observer: &'translation dyn TranslationObserver,
    pub(super) generator: RefCell<VariableGenerator>,
    /// The variables that stand for the blank nodes of the query body, keyed by label.
    pub(super) blank_node_variables: RefCell<BTreeMap<String, Variable>>,
    pub(super) state: RefCell<RewritingState>,
}

impl<'translation> GraphPatternRewriter<'translation> {
    pub fn new(
        options: &'translation TranslationOptions,
        dataset: Option<DatasetClause>,
        base_iri: Option<&'translation Iri<String>>,
        bindings: &'translation ExternalBindings,
        observer: &'translation dyn TranslationObserver,
        generator: VariableGenerator,
    ) -> Self {
        Self {
            options,
            dataset,
            base_iri,
            bindings,
            observer,
            generator: RefCell::new(generator),
            blank_node_variables: RefCell::default(),
            state: RefCell::default(),
        }
    }

    /// Translates `pattern` into a tree and computes the nullable variables of the tree.
    pub fn rewrite(&self, pattern: &GraphPattern) -> SparqlResult<TranslationResult> {
        self.rewrite_graph_pattern(pattern)
    }

    pub(super) fn rewrite_graph_pattern(
        &self,
        pattern: &GraphPattern,
    ) -> SparqlResult<TranslationResult> {
        self.observer.on_enter(pattern);
        let result = self.rewrite_graph_pattern_inner(pattern);
        self.observer.on_exit(pattern, result.as_ref());
        result
    }

    fn rewrite_graph_pattern_inner(
        &self,
        pattern: &GraphPattern,
    ) -> SparqlResult<TranslationResult> {
        match pattern {
            GraphPattern::Bgp { patterns } => self.rewrite_bgp(patterns),
            GraphPattern::Path { .. } => TranslationError::unsupported("Property paths"),
            GraphPattern::Join { left, right } => {
                let left = self.rewrite_graph_pattern(left)?;
                let right = self.rewrite_graph_pattern(right)?;
                self.join(left, right, SparqlJoinType::Inner, None)
            }
            GraphPattern::LeftJoin {
                left,
                right,
                expression,
            } => {
                let left = self.rewrite_graph_pattern(left)?;
                let right = self.rewrite_graph_pattern(right)?;
                self.join(left, right, SparqlJoinType::Left, expression.as_ref())
            }
            GraphPattern::Filter { expr, inner } => {
                let inner = self.rewrite_graph_pattern(inner)?;
                let condition =
                    self.rewrite_boolean_expression(expr, &inner.projected_variables())?;
                self.filter(inner, condition)
            }
            GraphPattern::Union { left, right } => {
                let left = self.rewrite_graph_pattern(left)?;
                let right = self.rewrite_graph_pattern(right)?;
                self.union(left, right)
            }
            GraphPattern::Graph { name, inner } => {
                let graph = named_node_pattern(name);
                let old_state = self.state.borrow().clone();
                self.state.replace(RewritingState {
                    active_graph: ActiveGraph::NamedGraph(graph),
                });
                let result = self.rewrite_graph_pattern(inner);
                self.state.replace(old_state);
                result
            }
            GraphPattern::Extend { .. } => self.rewrite_extend(pattern),
            GraphPattern::Minus { left, right } => {
                let left = self.rewrite_graph_pattern(left)?;
                let right = self.rewrite_graph_pattern(right)?;
                self.minus(left, right)
            }
            GraphPattern::Values {
                variables,
                bindings,
            } => self.rewrite_values(variables, bindings),
            GraphPattern::OrderBy { inner, expression } => {
                let inner = self.rewrite_graph_pattern(inner)?;
                self.order_by(inner, expression)
            }
            GraphPattern::Project { inner, variables } => {
                let inner = self.rewrite_graph_pattern(inner)?;
                self.project(inner, variables)
            }
            GraphPattern::Distinct { inner } | GraphPattern::Reduced { inner } => {
                let (tree, nullable) = self.rewrite_graph_pattern(inner)?.into_parts();
                TranslationResult::try_new(IqTree::distinct(tree), nullable)
            }
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => {
                let (tree, nullable) = self.rewrite_graph_pattern(inner)?.into_parts();
                TranslationResult::try_new(IqTree::slice(*start, *length, tree), nullable)
            }
            GraphPattern::Group {
                inner,
                variables,
                aggregates,
            } => self.rewrite_group(inner, variables, aggregates),
            _ => TranslationError::unsupported(format!("The graph pattern {pattern}")),
        }
    }

    /// Filters `inner` by `condition`.
    ///
    /// A condition that is always true is dropped. A condition that is never true turns the tree
    /// into an empty tree.
    fn filter(&self, inner: TranslationResult, condition: Term) -> SparqlResult<TranslationResult> {
        let condition = condition.simplify();
        let (tree, nullable) = inner.into_parts();
        match condition.as_boolean() {
            Some(true) => TranslationResult::try_new(tree, nullable),
            Some(false) => {
                TranslationResult::try_new(IqTree::empty(tree.projected_variables()), nullable)
            }
            None => {
                let tree = if condition.is_null() {
                    IqTree::empty(tree.projected_variables())
                } else {
                    IqTree::filter(condition, tree)?
                };
                TranslationResult::try_new(tree, nullable)
            }
        }
    }

    /// Projects `inner` onto `variables`.
    ///
    /// Variables that `inner` does not provide are bound to their external value, or to NULL if
    /// there is none.
    pub(crate) fn project(
        &self,
        inner: TranslationResult,
        variables: &[Variable],
    ) -> SparqlResult<TranslationResult> {
        let projected = variables.iter().cloned().collect::<BTreeSet<_>>();
        let child_variables = inner.projected_variables();
        if projected == child_variables {
            return Ok(inner);
        }

        let substitution = projected
            .difference(&child_variables)
            .map(|variable| (variable.clone(), self.external_value_or_null(variable)))
            .collect::<Substitution>();
        let (tree, nullable) = inner.into_parts();
        let nullable = nullable
            .intersection(&projected)
            .cloned()
            .chain(
                substitution
                    .iter()
                    .filter(|(_, term)| term.is_null())
                    .map(|(variable, _)| variable.clone()),
            )
            .collect();

        let tree = IqTree::construction(projected, substitution, tree)?;
        TranslationResult::try_new(tree, nullable)
    }

    /// Sorts `inner`. Comparators without variables cannot influence the order and are dropped.
    fn order_by(
        &self,
        inner: TranslationResult,
        expressions: &[OrderExpression],
    ) -> SparqlResult<TranslationResult> {
        let known_variables = inner.projected_variables();
        let mut comparators = Vec::with_capacity(expressions.len());
        for expression in expressions {
            let (expression, ascending) = match expression {
                OrderExpression::Asc(inner) => (inner, true),
                OrderExpression::Desc(inner) => (inner, false),
            };
            let term = self.rewrite_expression(expression, &known_variables)?;
            if !term.is_ground() {
                comparators.push(OrderComparator::new(term, ascending));
            }
        }

        if comparators.is_empty() {
            return Ok(inner);
        }
        let (tree, nullable) = inner.into_parts();
        TranslationResult::try_new(IqTree::order_by(comparators, tree)?, nullable)
    }

    /// Rewrites an [Expression] in the scope of `known_variables`.
    pub(super) fn rewrite_expression(
        &self,
        expression: &Expression,
        known_variables: &BTreeSet<Variable>,
    ) -> SparqlResult<Term> {
        ExpressionRewriter::new(self, known_variables).rewrite(expression)
    }

    /// Rewrites an [Expression] that is used as a condition.
    pub(super) fn rewrite_boolean_expression(
        &self,
        expression: &Expression,
        known_variables: &BTreeSet<Variable>,
    ) -> SparqlResult<Term> {
        ExpressionRewriter::new(self, known_variables).rewrite_boolean(expression)
    }

    /// Rewrites an [AggregateExpression] in the scope of `known_variables`.
    pub(super) fn rewrite_aggregate(
        &self,
        expression: &AggregateExpression,
        known_variables: &BTreeSet<Variable>,
    ) -> SparqlResult<Term> {
        ExpressionRewriter::new(self, known_variables).rewrite_aggregate(expression)
    }

    /// The value of a variable that is not in scope.
    pub(super) fn external_value_or_null(&self, variable: &Variable) -> Term {
        self.bindings
            .get(variable)
            .map_or_else(Term::null, |value| Term::Constant(value.clone()))
    }

    /// Generates a fresh variable whose name is derived from `base`.
    pub(crate) fn generate_variable_from(&self, base: &str) -> Variable {
        self.generator
            .borrow_mut()
            .generate_new_variable_from(&Variable::new_unchecked(base))
    }

    /// Generates a fresh variable with a neutral name.
    pub(crate) fn generate_variable(&self) -> Variable {
        self.generator.borrow_mut().generate_new_variable()
    }
}

/// The graph that the triple patterns are matched against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) enum ActiveGraph {
    /// The default graph of the dataset.
    #[default]
    DefaultGraph,
    /// A named graph, given as a variable (`GRAPH ?g`) or an IRI (`GRAPH <g>`).
    NamedGraph(Term),
}

#[derive(Clone, Debug, Default)]
pub(super) struct RewritingState {
    /// Currently active graph.
    pub(super) active_graph: ActiveGraph,
}
