use crate::tree::OrderComparator;
use crate::IqTree;
use sparql_iq_model::{InjectiveSubstitution, Substitution};
use std::sync::Arc;

impl IqTree {
    /// Renames every occurrence of the variables in the domain of `renaming`, including the
    /// occurrences in all descendants.
    ///
    /// As the renaming is injective, the result is equivalent to the input up to the names of the
    /// variables.
    #[must_use]
    pub fn rename(&self, renaming: &InjectiveSubstitution) -> IqTree {
        if renaming.is_empty() {
            return self.clone();
        }

        let rename_child = |child: &Arc<IqTree>| Arc::new(child.rename(renaming));
        match self {
            IqTree::True => IqTree::True,
            IqTree::Empty { variables } => IqTree::Empty {
                variables: renaming.apply_to_set(variables),
            },
            IqTree::IntensionalData { atom } => IqTree::IntensionalData {
                atom: atom.rename(renaming),
            },
            IqTree::Construction {
                projected,
                substitution,
                child,
            } => IqTree::Construction {
                projected: renaming.apply_to_set(projected),
                substitution: rename_substitution(substitution, renaming),
                child: rename_child(child),
            },
            IqTree::Filter { condition, child } => IqTree::Filter {
                condition: renaming.apply(condition),
                child: rename_child(child),
            },
            IqTree::Distinct { child } => IqTree::Distinct {
                child: rename_child(child),
            },
            IqTree::Slice {
                offset,
                limit,
                child,
            } => IqTree::Slice {
                offset: *offset,
                limit: *limit,
                child: rename_child(child),
            },
            IqTree::OrderBy { comparators, child } => IqTree::OrderBy {
                comparators: comparators
                    .iter()
                    .map(|c| OrderComparator::new(renaming.apply(&c.term), c.ascending))
                    .collect(),
                child: rename_child(child),
            },
            IqTree::Aggregation {
                grouping,
                substitution,
                child,
            } => IqTree::Aggregation {
                grouping: renaming.apply_to_set(grouping),
                substitution: rename_substitution(substitution, renaming),
                child: rename_child(child),
            },
            IqTree::InnerJoin {
                condition,
                children,
            } => IqTree::InnerJoin {
                condition: condition.as_ref().map(|c| renaming.apply(c)),
                children: children.iter().map(|c| c.rename(renaming)).collect(),
            },
            IqTree::LeftJoin {
                condition,
                left,
                right,
            } => IqTree::LeftJoin {
                condition: condition.as_ref().map(|c| renaming.apply(c)),
                left: rename_child(left),
                right: rename_child(right),
            },
            IqTree::Union {
                variables,
                children,
            } => IqTree::Union {
                variables: renaming.apply_to_set(variables),
                children: children.iter().map(|c| c.rename(renaming)).collect(),
            },
        }
    }
}

/// Renames both the domain and the terms of a substitution.
fn rename_substitution(
    substitution: &Substitution,
    renaming: &InjectiveSubstitution,
) -> Substitution {
    substitution
        .iter()
        .map(|(variable, term)| (renaming.apply_to_variable(variable), renaming.apply(term)))
        .collect()
}

