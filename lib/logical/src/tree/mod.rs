mod display;
mod rename;

use crate::{DataAtom, IqError, IqResult};
use itertools::Itertools;
use sparql_iq_model::{Substitution, Term, Variable};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A comparator of an [IqTree::OrderBy] node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OrderComparator {
    pub term: Term,
    pub ascending: bool,
}

impl OrderComparator {
    pub fn new(term: Term, ascending: bool) -> Self {
        Self { term, ascending }
    }
}

/// An immutable tree of the intermediate query representation.
///
/// Every node exposes its *projected* variables (the variables of its solutions) and its *known*
/// variables (the projected variables and all variables used by any descendant). Variables that
/// are known but not projected can be renamed freely when the tree becomes part of a larger tree.
///
/// The variants can be matched on freely. For building trees, use the checked constructors (e.g.,
/// [IqTree::construction]) that validate the invariants of each node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IqTree {
    /// Produces a single solution without any bindings.
    True,
    /// Produces no solutions.
    Empty { variables: BTreeSet<Variable> },
    /// A leaf that must be resolved against a mapping.
    IntensionalData { atom: DataAtom },
    /// Projects the child onto `projected`, defining the variables of the substitution's domain.
    Construction {
        projected: BTreeSet<Variable>,
        substitution: Substitution,
        child: Arc<IqTree>,
    },
    Filter {
        condition: Term,
        child: Arc<IqTree>,
    },
    Distinct { child: Arc<IqTree> },
    Slice {
        offset: usize,
        limit: Option<usize>,
        child: Arc<IqTree>,
    },
    OrderBy {
        comparators: Vec<OrderComparator>,
        child: Arc<IqTree>,
    },
    /// Groups the child by `grouping` and computes the aggregates of the substitution.
    Aggregation {
        grouping: BTreeSet<Variable>,
        substitution: Substitution,
        child: Arc<IqTree>,
    },
    InnerJoin {
        condition: Option<Term>,
        children: Vec<IqTree>,
    },
    LeftJoin {
        condition: Option<Term>,
        left: Arc<IqTree>,
        right: Arc<IqTree>,
    },
    Union {
        variables: BTreeSet<Variable>,
        children: Vec<IqTree>,
    },
}

impl IqTree {
    /// Creates an [IqTree::Empty] node.
    pub fn empty(variables: BTreeSet<Variable>) -> IqTree {
        IqTree::Empty { variables }
    }

    /// Creates an [IqTree::IntensionalData] leaf.
    pub fn intensional(atom: DataAtom) -> IqTree {
        IqTree::IntensionalData { atom }
    }

    /// Creates an [IqTree::Construction] node.
    ///
    /// The substitution must only define projected variables that the child does not provide.
    /// Every other projected variable, and every variable used by the substitution, must be
    /// projected by the child.
    pub fn construction(
        projected: BTreeSet<Variable>,
        substitution: Substitution,
        child: IqTree,
    ) -> IqResult<IqTree> {
        let child_variables = child.projected_variables();
        let domain = substitution.domain();

        if let Some(variable) = domain.iter().find(|v| !projected.contains(*v)) {
            return IqError::invalid_node(
                "construction",
                format!("{variable} is defined but not projected"),
            );
        }
        if let Some(variable) = domain.iter().find(|v| child_variables.contains(*v)) {
            return IqError::invalid_node(
                "construction",
                format!("{variable} is defined but already provided by the child"),
            );
        }
        if let Some(variable) = projected
            .difference(&domain)
            .find(|v| !child_variables.contains(*v))
        {
            return IqError::invalid_node(
                "construction",
                format!("{variable} is projected but neither defined nor provided by the child"),
            );
        }
        ensure_variables_provided("construction", &substitution.range_variables(), &child_variables)?;

        Ok(IqTree::Construction {
            projected,
            substitution,
            child: Arc::new(child),
        })
    }

    /// Creates an [IqTree::Filter] node.
    pub fn filter(condition: Term, child: IqTree) -> IqResult<IqTree> {
        ensure_variables_provided("filter", &condition.variables(), &child.projected_variables())?;
        Ok(IqTree::Filter {
            condition,
            child: Arc::new(child),
        })
    }

    /// Creates an [IqTree::Distinct] node.
    pub fn distinct(child: IqTree) -> IqTree {
        IqTree::Distinct {
            child: Arc::new(child),
        }
    }

    /// Creates an [IqTree::Slice] node.
    pub fn slice(offset: usize, limit: Option<usize>, child: IqTree) -> IqTree {
        IqTree::Slice {
            offset,
            limit,
            child: Arc::new(child),
        }
    }

    /// Creates an [IqTree::OrderBy] node.
    pub fn order_by(comparators: Vec<OrderComparator>, child: IqTree) -> IqResult<IqTree> {
        if comparators.is_empty() {
            return IqError::invalid_node("order by", "no comparators");
        }
        let child_variables = child.projected_variables();
        for comparator in &comparators {
            ensure_variables_provided("order by", &comparator.term.variables(), &child_variables)?;
        }
        Ok(IqTree::OrderBy {
            comparators,
            child: Arc::new(child),
        })
    }

    /// Creates an [IqTree::Aggregation] node. Every term of the substitution must be an aggregate.
    pub fn aggregation(
        grouping: BTreeSet<Variable>,
        substitution: Substitution,
        child: IqTree,
    ) -> IqResult<IqTree> {
        let child_variables = child.projected_variables();
        ensure_variables_provided("aggregation", &grouping, &child_variables)?;
        ensure_variables_provided("aggregation", &substitution.range_variables(), &child_variables)?;

        for (variable, term) in &substitution {
            if grouping.contains(variable) {
                return IqError::invalid_node(
                    "aggregation",
                    format!("{variable} is both a grouping and an aggregate variable"),
                );
            }
            let is_aggregate = term
                .as_functional_term()
                .is_some_and(|f| f.symbol().is_aggregate());
            if !is_aggregate {
                return IqError::invalid_node(
                    "aggregation",
                    format!("{term} is not an aggregate"),
                );
            }
        }

        Ok(IqTree::Aggregation {
            grouping,
            substitution,
            child: Arc::new(child),
        })
    }

    /// Creates an [IqTree::InnerJoin] node with at least two children.
    pub fn inner_join(condition: Option<Term>, children: Vec<IqTree>) -> IqResult<IqTree> {
        if children.len() < 2 {
            return IqError::invalid_node("inner join", "less than two children");
        }
        if let Some(condition) = &condition {
            let variables = children
                .iter()
                .flat_map(IqTree::projected_variables)
                .collect();
            ensure_variables_provided("inner join", &condition.variables(), &variables)?;
        }
        Ok(IqTree::InnerJoin {
            condition,
            children,
        })
    }

    /// Creates an [IqTree::LeftJoin] node.
    pub fn left_join(condition: Option<Term>, left: IqTree, right: IqTree) -> IqResult<IqTree> {
        if let Some(condition) = &condition {
            let mut variables = left.projected_variables();
            variables.extend(right.projected_variables());
            ensure_variables_provided("left join", &condition.variables(), &variables)?;
        }
        Ok(IqTree::LeftJoin {
            condition,
            left: Arc::new(left),
            right: Arc::new(right),
        })
    }

    /// Creates an [IqTree::Union] node. All children must project exactly `variables`.
    pub fn union(variables: BTreeSet<Variable>, children: Vec<IqTree>) -> IqResult<IqTree> {
        if children.len() < 2 {
            return IqError::invalid_node("union", "less than two children");
        }
        if let Some(child) = children
            .iter()
            .find(|child| child.projected_variables() != variables)
        {
            return IqError::invalid_node(
                "union",
                format!(
                    "child projects [{}] instead of [{}]",
                    child.projected_variables().iter().join(", "),
                    variables.iter().join(", ")
                ),
            );
        }
        Ok(IqTree::Union {
            variables,
            children,
        })
    }

    /// Returns the variables of the solutions of this tree.
    pub fn projected_variables(&self) -> BTreeSet<Variable> {
        match self {
            IqTree::True => BTreeSet::new(),
            IqTree::Empty { variables } | IqTree::Union { variables, .. } => variables.clone(),
            IqTree::IntensionalData { atom } => atom.variables(),
            IqTree::Construction { projected, .. } => projected.clone(),
            IqTree::Filter { child, .. }
            | IqTree::Distinct { child }
            | IqTree::Slice { child, .. }
            | IqTree::OrderBy { child, .. } => child.projected_variables(),
            IqTree::Aggregation {
                grouping,
                substitution,
                ..
            } => grouping.union(&substitution.domain()).cloned().collect(),
            IqTree::InnerJoin { children, .. } => children
                .iter()
                .flat_map(IqTree::projected_variables)
                .collect(),
            IqTree::LeftJoin { left, right, .. } => {
                let mut result = left.projected_variables();
                result.extend(right.projected_variables());
                result
            }
        }
    }

    /// Returns the projected variables and all variables that are used by any descendant.
    pub fn known_variables(&self) -> BTreeSet<Variable> {
        let mut result = BTreeSet::new();
        self.collect_known_variables(&mut result);
        result
    }

    fn collect_known_variables(&self, result: &mut BTreeSet<Variable>) {
        match self {
            IqTree::True => {}
            IqTree::Empty { variables } => result.extend(variables.iter().cloned()),
            IqTree::IntensionalData { atom } => result.extend(atom.variables()),
            IqTree::Construction {
                projected,
                substitution,
                child,
            } => {
                result.extend(projected.iter().cloned());
                result.extend(substitution.range_variables());
                child.collect_known_variables(result);
            }
            IqTree::Filter { condition, child } => {
                result.extend(condition.variables());
                child.collect_known_variables(result);
            }
            IqTree::Distinct { child } | IqTree::Slice { child, .. } => {
                child.collect_known_variables(result);
            }
            IqTree::OrderBy { comparators, child } => {
                for comparator in comparators {
                    result.extend(comparator.term.variables());
                }
                child.collect_known_variables(result);
            }
            IqTree::Aggregation {
                grouping,
                substitution,
                child,
            } => {
                result.extend(grouping.iter().cloned());
                result.extend(substitution.domain());
                result.extend(substitution.range_variables());
                child.collect_known_variables(result);
            }
            IqTree::InnerJoin {
                condition,
                children,
            } => {
                if let Some(condition) = condition {
                    result.extend(condition.variables());
                }
                for child in children {
                    child.collect_known_variables(result);
                }
            }
            IqTree::LeftJoin {
                condition,
                left,
                right,
            } => {
                if let Some(condition) = condition {
                    result.extend(condition.variables());
                }
                left.collect_known_variables(result);
                right.collect_known_variables(result);
            }
            IqTree::Union {
                variables,
                children,
            } => {
                result.extend(variables.iter().cloned());
                for child in children {
                    child.collect_known_variables(result);
                }
            }
        }
    }

    /// Returns the variables that are used internally but not projected.
    pub fn non_projected_variables(&self) -> BTreeSet<Variable> {
        let projected = self.projected_variables();
        self.known_variables()
            .into_iter()
            .filter(|v| !projected.contains(v))
            .collect()
    }

    pub fn is_empty_node(&self) -> bool {
        matches!(self, IqTree::Empty { .. })
    }

    /// Returns whether the tree is one of the nodes that modify the solution sequence as a whole.
    pub fn is_query_modifier(&self) -> bool {
        matches!(
            self,
            IqTree::Slice { .. } | IqTree::Distinct { .. } | IqTree::OrderBy { .. }
        )
    }

    /// Collects all data atoms of the tree, from left to right.
    pub fn data_atoms(&self) -> Vec<&DataAtom> {
        let mut result = Vec::new();
        self.collect_data_atoms(&mut result);
        result
    }

    fn collect_data_atoms<'tree>(&'tree self, result: &mut Vec<&'tree DataAtom>) {
        match self {
            IqTree::True | IqTree::Empty { .. } => {}
            IqTree::IntensionalData { atom } => result.push(atom),
            IqTree::Construction { child, .. }
            | IqTree::Filter { child, .. }
            | IqTree::Distinct { child }
            | IqTree::Slice { child, .. }
            | IqTree::OrderBy { child, .. }
            | IqTree::Aggregation { child, .. } => child.collect_data_atoms(result),
            IqTree::InnerJoin { children, .. } | IqTree::Union { children, .. } => {
                for child in children {
                    child.collect_data_atoms(result);
                }
            }
            IqTree::LeftJoin { left, right, .. } => {
                left.collect_data_atoms(result);
                right.collect_data_atoms(result);
            }
        }
    }
}

fn ensure_variables_provided(
    node: &'static str,
    used: &BTreeSet<Variable>,
    provided: &BTreeSet<Variable>,
) -> IqResult<()> {
    match used.iter().find(|v| !provided.contains(*v)) {
        Some(variable) => IqError::invalid_node(node, format!("{variable} is not provided by the child")),
        None => Ok(()),
    }
}

