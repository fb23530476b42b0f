use crate::sparql::error::{SparqlResult, TranslationError};
use crate::sparql::rewriting::{GraphPatternRewriter, TranslationResult};
use sparql_iq_logical::IqTree;
use sparql_iq_model::{Substitution, Term, Variable};
use spargebra::algebra::{AggregateExpression, Expression, GraphPattern};
use std::collections::BTreeSet;

impl GraphPatternRewriter<'_> {
    /// Translates a chain of `BIND`s.
    ///
    /// Consecutive definitions are collected and grouped such that no definition of a group refers
    /// to a variable that is defined in the same group. Each group becomes a single construction
    /// node.
    pub(super) fn rewrite_extend(&self, pattern: &GraphPattern) -> SparqlResult<TranslationResult> {
        let mut definitions = Vec::new();
        let mut current = pattern;
        while let GraphPattern::Extend {
            inner,
            variable,
            expression,
        } = current
        {
            definitions.push((variable, expression));
            current = inner;
        }
        definitions.reverse();

        let child = self.rewrite_graph_pattern(current)?;
        let child_variables = child.projected_variables();
        let mut known_variables = child_variables.clone();
        let mut terms = Vec::with_capacity(definitions.len());
        for (variable, expression) in definitions {
            if matches!(expression, Expression::Variable(inner) if inner == variable)
                || child_variables.contains(variable)
            {
                continue;
            }
            let term = self.rewrite_expression(expression, &known_variables)?;
            known_variables.insert(variable.clone());
            terms.push((variable.clone(), term));
        }

        group_definitions(terms)
            .into_iter()
            .try_fold(child, |result, group| self.extend(result, group))
    }

    /// Adds the definitions of `substitution` on top of `child`.
    fn extend(
        &self,
        child: TranslationResult,
        substitution: Substitution,
    ) -> SparqlResult<TranslationResult> {
        let (tree, nullable) = child.into_parts();
        let new_nullable = substitution
            .iter()
            .filter(|(_, term)| term.contains_null() || term.mentions_any(&nullable))
            .map(|(variable, _)| variable.clone())
            .collect::<Vec<_>>();
        let defined = substitution.domain();

        let projected = tree
            .projected_variables()
            .into_iter()
            .chain(defined.iter().cloned())
            .collect();
        let tree = IqTree::construction(projected, substitution, tree)?;
        let nullable = nullable.into_iter().chain(new_nullable).collect();
        let result = TranslationResult::try_new(tree, nullable)?;
        self.with_external_binding_filter(result, &defined)
    }

    /// Translates a `GROUP BY` with its aggregates.
    pub(super) fn rewrite_group(
        &self,
        inner: &GraphPattern,
        variables: &[Variable],
        aggregates: &[(Variable, AggregateExpression)],
    ) -> SparqlResult<TranslationResult> {
        let grouping = variables.iter().cloned().collect::<BTreeSet<_>>();
        let child = self.rewrite_graph_pattern(inner)?;
        let child = self.bind_missing_to_null(child, &grouping)?;

        let mut known_variables = child.projected_variables();
        let mut terms = Vec::with_capacity(aggregates.len());
        for (variable, aggregate) in aggregates {
            let term = self.rewrite_aggregate(aggregate, &known_variables)?;
            known_variables.insert(variable.clone());
            terms.push((variable.clone(), term));
        }

        let mut groups = group_definitions(terms);
        let substitution = match groups.len() {
            0 => Substitution::empty(),
            1 => groups.swap_remove(0),
            _ => {
                return TranslationError::invalid(
                    "An aggregate cannot refer to the result of another aggregate",
                )
            }
        };

        let (tree, child_nullable) = child.into_parts();
        let nullable = grouping
            .intersection(&child_nullable)
            .cloned()
            .chain(
                substitution
                    .iter()
                    .filter(|(_, term)| {
                        term.as_functional_term()
                            .map_or(true, |term| term.symbol().may_return_null())
                    })
                    .map(|(variable, _)| variable.clone()),
            )
            .collect();
        let defined = substitution.domain();

        let tree = IqTree::aggregation(grouping, substitution, tree)?;
        let result = TranslationResult::try_new(tree, nullable)?;
        self.with_external_binding_filter(result, &defined)
    }

    /// Makes sure that `child` projects every variable of `variables`. Missing variables are
    /// bound to NULL.
    fn bind_missing_to_null(
        &self,
        child: TranslationResult,
        variables: &BTreeSet<Variable>,
    ) -> SparqlResult<TranslationResult> {
        let projected = child.projected_variables();
        if variables.is_subset(&projected) {
            return Ok(child);
        }

        let substitution = variables
            .difference(&projected)
            .map(|variable| (variable.clone(), Term::null()))
            .collect::<Substitution>();
        let (tree, nullable) = child.into_parts();
        let nullable = nullable
            .into_iter()
            .chain(substitution.domain())
            .collect();
        let projected = projected.into_iter().chain(substitution.domain()).collect();
        let tree = IqTree::construction(projected, substitution, tree)?;
        TranslationResult::try_new(tree, nullable)
    }
}

/// Splits a sequence of definitions into groups of independent definitions.
///
/// A new group is started whenever a definition refers to a variable that is defined in the
/// current group. The order of the definitions is preserved.
fn group_definitions(definitions: Vec<(Variable, Term)>) -> Vec<Substitution> {
    definitions
        .into_iter()
        .fold(Vec::<Vec<(Variable, Term)>>::new(), |mut groups, (variable, term)| {
            let used = term.variables();
            let depends_on_current = groups.last().map_or(true, |group| {
                group.iter().any(|(defined, _)| used.contains(defined))
            });
            if depends_on_current {
                groups.push(vec![(variable, term)]);
            } else if let Some(group) = groups.last_mut() {
                group.push((variable, term));
            }
            groups
        })
        .into_iter()
        .map(Substitution::from_iter)
        .collect()
}
