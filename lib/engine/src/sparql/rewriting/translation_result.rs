use crate::sparql::error::{SparqlResult, TranslationError};
use itertools::Itertools;
use sparql_iq_logical::IqTree;
use sparql_iq_model::Variable;
use std::collections::BTreeSet;

/// The translation of a graph pattern: a tree plus the projected variables that may be unbound.
///
/// A variable that is not nullable is guaranteed to be bound in every solution of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslationResult {
    tree: IqTree,
    nullable_variables: BTreeSet<Variable>,
}

impl TranslationResult {
    /// Creates a new [TranslationResult].
    ///
    /// Fails if a nullable variable is not projected by `tree`.
    pub(crate) fn try_new(
        tree: IqTree,
        nullable_variables: BTreeSet<Variable>,
    ) -> SparqlResult<Self> {
        let projected = tree.projected_variables();
        if !nullable_variables.is_subset(&projected) {
            return TranslationError::internal(format!(
                "Nullable variables {} are not projected by the tree",
                nullable_variables.difference(&projected).join(", ")
            ));
        }
        Ok(Self {
            tree,
            nullable_variables,
        })
    }

    /// A translation without nullable variables.
    pub(crate) fn non_nullable(tree: IqTree) -> Self {
        Self {
            tree,
            nullable_variables: BTreeSet::new(),
        }
    }

    pub fn tree(&self) -> &IqTree {
        &self.tree
    }

    pub fn nullable_variables(&self) -> &BTreeSet<Variable> {
        &self.nullable_variables
    }

    pub fn projected_variables(&self) -> BTreeSet<Variable> {
        self.tree.projected_variables()
    }

    pub fn into_tree(self) -> IqTree {
        self.tree
    }

    pub(crate) fn into_parts(self) -> (IqTree, BTreeSet<Variable>) {
        (self.tree, self.nullable_variables)
    }
}
