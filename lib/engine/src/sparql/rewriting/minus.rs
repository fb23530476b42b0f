use crate::sparql::error::SparqlResult;
use crate::sparql::rewriting::{GraphPatternRewriter, TranslationResult};
use sparql_iq_logical::IqTree;
use sparql_iq_model::{Substitution, Term};
use std::collections::BTreeSet;

impl GraphPatternRewriter<'_> {
    /// Translates `left MINUS right`.
    ///
    /// The MINUS is expressed as an anti-join: a left join with the renamed right side, followed by
    /// a filter that keeps the solutions without a match. A solution of the left side is only
    /// removed if it shares at least one bound variable with a compatible solution of the right
    /// side. If the sides share no variable, nothing is removed.
    pub(super) fn minus(
        &self,
        left: TranslationResult,
        right: TranslationResult,
    ) -> SparqlResult<TranslationResult> {
        let left_projected = left.projected_variables();
        let shared = left_projected
            .intersection(&right.projected_variables())
            .cloned()
            .collect::<BTreeSet<_>>();
        if shared.is_empty() {
            return Ok(left);
        }

        let shared_renaming = self
            .generator
            .borrow_mut()
            .create_injective_renaming(&shared)?;
        let renamings = self.non_projected_renamings(left.tree(), right.tree())?;

        let compatibility = shared.iter().map(|variable| {
            let renamed = Term::Variable(shared_renaming.apply_to_variable(variable));
            let original = Term::Variable(variable.clone());
            let mut alternatives = vec![Term::strict_equality(original.clone(), renamed.clone())];
            if left.nullable_variables().contains(variable) {
                alternatives.push(Term::is_null_of(original));
            }
            if right.nullable_variables().contains(variable) {
                alternatives.push(Term::is_null_of(renamed));
            }
            Term::disjunction(alternatives)
        });
        // Without nullable shared variables, compatibility already implies a match.
        let has_nullable = shared.iter().any(|variable| {
            left.nullable_variables().contains(variable)
                || right.nullable_variables().contains(variable)
        });
        let some_match = has_nullable
            .then(|| {
                Term::disjunction(shared.iter().map(|variable| {
                    Term::strict_equality(
                        Term::Variable(variable.clone()),
                        Term::Variable(shared_renaming.apply_to_variable(variable)),
                    )
                }))
            })
            .flatten();
        let condition = Term::conjunction(compatibility.chain([some_match]).flatten());

        let left_tree = left.tree().rename(&renamings.left);
        let right_tree = right
            .tree()
            .rename(&shared_renaming.union(&renamings.right)?);
        let left_join = IqTree::left_join(condition, left_tree, right_tree)?;

        let no_match = Term::conjunction(
            shared_renaming
                .range()
                .into_iter()
                .map(|variable| Term::is_null_of(Term::Variable(variable))),
        );
        let filtered = match no_match {
            Some(no_match) => IqTree::filter(no_match, left_join)?,
            None => left_join,
        };

        let (_, nullable) = left.into_parts();
        let tree = IqTree::construction(left_projected, Substitution::empty(), filtered)?;
        TranslationResult::try_new(tree, nullable)
    }
}
