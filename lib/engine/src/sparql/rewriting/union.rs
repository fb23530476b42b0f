use crate::sparql::error::SparqlResult;
use crate::sparql::rewriting::{GraphPatternRewriter, TranslationResult};
use sparql_iq_logical::IqTree;
use sparql_iq_model::{Substitution, Term, Variable};
use std::collections::BTreeSet;

impl GraphPatternRewriter<'_> {
    /// Translates the union of two graph patterns.
    ///
    /// Both sides are padded to the same variables by binding the variables of the other side to
    /// NULL.
    pub(super) fn union(
        &self,
        left: TranslationResult,
        right: TranslationResult,
    ) -> SparqlResult<TranslationResult> {
        let left_projected = left.projected_variables();
        let right_projected = right.projected_variables();
        let all_projected = left_projected
            .union(&right_projected)
            .cloned()
            .collect::<BTreeSet<_>>();

        // The padding variables are projected, hence the internal variables must be renamed apart
        // before padding.
        let renamings = self.non_projected_renamings(left.tree(), right.tree())?;
        let left_tree = pad(
            left.tree().rename(&renamings.left),
            &left_projected,
            &all_projected,
        )?;
        let right_tree = pad(
            right.tree().rename(&renamings.right),
            &right_projected,
            &all_projected,
        )?;

        let nullable = left
            .nullable_variables()
            .iter()
            .chain(right.nullable_variables())
            .chain(all_projected.difference(&left_projected))
            .chain(all_projected.difference(&right_projected))
            .cloned()
            .collect();

        let union = IqTree::union(all_projected.clone(), vec![left_tree, right_tree])?;
        let tree = IqTree::construction(all_projected, Substitution::empty(), union)?;
        TranslationResult::try_new(tree, nullable)
    }
}

/// Binds the variables of `all_projected` that `tree` does not provide to NULL.
fn pad(
    tree: IqTree,
    projected: &BTreeSet<Variable>,
    all_projected: &BTreeSet<Variable>,
) -> SparqlResult<IqTree> {
    let substitution = all_projected
        .difference(projected)
        .map(|variable| (variable.clone(), Term::null()))
        .collect::<Substitution>();
    Ok(IqTree::construction(
        all_projected.clone(),
        substitution,
        tree,
    )?)
}
