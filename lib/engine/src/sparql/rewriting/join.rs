use crate::sparql::error::SparqlResult;
use crate::sparql::rewriting::{GraphPatternRewriter, TranslationResult};
use itertools::Itertools;
use sparql_iq_logical::IqTree;
use sparql_iq_model::{InjectiveSubstitution, Substitution, Term, Variable};
use spargebra::algebra::Expression;
use std::collections::BTreeSet;

/// The kinds of joins that compose two graph patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SparqlJoinType {
    /// A conjunction of two graph patterns.
    Inner,
    /// `OPTIONAL`. The solutions of the left side are kept if the right side has no compatible
    /// solution.
    Left,
}

/// Renamings that separate the internal (i.e., not projected) variables of two trees that are
/// about to be combined.
pub(super) struct NonProjectedRenamings {
    pub left: InjectiveSubstitution,
    pub right: InjectiveSubstitution,
}

impl GraphPatternRewriter<'_> {
    /// Joins two translations.
    ///
    /// In SPARQL, two solutions are compatible if the shared variables are bound to the same term
    /// *or unbound on either side*. A shared variable that may be unbound on any side is therefore
    /// renamed apart on both sides, compared by an explicit compatibility condition, and merged
    /// with `COALESCE` above the join.
    pub(super) fn join(
        &self,
        left: TranslationResult,
        right: TranslationResult,
        join_type: SparqlJoinType,
        filter: Option<&Expression>,
    ) -> SparqlResult<TranslationResult> {
        if join_type == SparqlJoinType::Inner {
            if left.tree() == &IqTree::True {
                return Ok(right);
            }
            if right.tree() == &IqTree::True {
                return Ok(left);
            }
        }

        let left_projected = left.projected_variables();
        let right_projected = right.projected_variables();
        let shared = left_projected
            .intersection(&right_projected)
            .cloned()
            .collect::<BTreeSet<_>>();
        let nullable = left
            .nullable_variables()
            .union(right.nullable_variables())
            .cloned()
            .collect::<BTreeSet<_>>();
        let to_coalesce = shared
            .intersection(&nullable)
            .cloned()
            .collect::<BTreeSet<_>>();

        let (left_coalescing, right_coalescing) = {
            let mut generator = self.generator.borrow_mut();
            (
                generator.create_injective_renaming(&to_coalesce)?,
                generator.create_injective_renaming(&to_coalesce)?,
            )
        };
        let renamings = self.non_projected_renamings(left.tree(), right.tree())?;
        tracing::trace!(
            ?join_type,
            coalesced = %to_coalesce.iter().join(", "),
            "Joining graph patterns"
        );

        let top_substitution = to_coalesce
            .iter()
            .map(|variable| -> SparqlResult<(Variable, Term)> {
                let coalesce = Term::coalesce(vec![
                    Term::Variable(left_coalescing.apply_to_variable(variable)),
                    Term::Variable(right_coalescing.apply_to_variable(variable)),
                ])?;
                Ok((variable.clone(), coalesce))
            })
            .collect::<SparqlResult<Substitution>>()?;

        let all_projected = left_projected
            .union(&right_projected)
            .cloned()
            .collect::<BTreeSet<_>>();
        let filter = match (join_type, filter) {
            (SparqlJoinType::Left, Some(filter)) => {
                let filter = self.rewrite_boolean_expression(filter, &all_projected)?;
                Some(top_substitution.apply(&filter))
            }
            _ => None,
        };
        let compatibility = to_coalesce.iter().map(|variable| {
            equal_or_either_null(
                left_coalescing.apply_to_variable(variable),
                right_coalescing.apply_to_variable(variable),
            )
        });
        let condition = Term::conjunction(filter.into_iter().chain(compatibility));

        let nullable = match join_type {
            SparqlJoinType::Inner => nullable.difference(&shared).cloned().collect(),
            SparqlJoinType::Left => nullable
                .into_iter()
                .chain(right_projected.difference(&left_projected).cloned())
                .collect(),
        };

        let left_tree = left
            .tree()
            .rename(&left_coalescing.union(&renamings.left)?);
        let right_tree = right
            .tree()
            .rename(&right_coalescing.union(&renamings.right)?);
        let join = match join_type {
            SparqlJoinType::Inner => IqTree::inner_join(condition, vec![left_tree, right_tree])?,
            SparqlJoinType::Left => IqTree::left_join(condition, left_tree, right_tree)?,
        };

        let tree = if top_substitution.is_empty() {
            join
        } else {
            IqTree::construction(all_projected, top_substitution, join)?
        };
        TranslationResult::try_new(tree, nullable)
    }

    /// Computes the renamings that make the internal variables of `left` disjoint from all
    /// variables of `right` and vice versa.
    pub(super) fn non_projected_renamings(
        &self,
        left: &IqTree,
        right: &IqTree,
    ) -> SparqlResult<NonProjectedRenamings> {
        let left_known = left.known_variables();
        let right_known = right.known_variables();
        let left_clashing = left
            .non_projected_variables()
            .intersection(&right_known)
            .cloned()
            .collect::<BTreeSet<_>>();
        let right_clashing = right
            .non_projected_variables()
            .intersection(&left_known)
            .cloned()
            .collect::<BTreeSet<_>>();

        let mut generator = self.generator.borrow_mut();
        generator.register_variables(left_known.iter().chain(&right_known));
        Ok(NonProjectedRenamings {
            left: generator.create_injective_renaming(&left_clashing)?,
            right: generator.create_injective_renaming(&right_clashing)?,
        })
    }
}

/// `lhs = rhs`, or one of them is unbound.
pub(super) fn equal_or_either_null(lhs: Variable, rhs: Variable) -> Term {
    let lhs = Term::Variable(lhs);
    let rhs = Term::Variable(rhs);
    Term::disjunction([
        Term::strict_equality(lhs.clone(), rhs.clone()),
        Term::is_null_of(lhs),
        Term::is_null_of(rhs),
    ])
    .unwrap_or_else(|| Term::boolean(true))
}
