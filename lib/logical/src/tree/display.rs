use crate::IqTree;
use itertools::Itertools;
use sparql_iq_model::Variable;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

impl Display for IqTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

impl IqTree {
    fn fmt_indented(&self, f: &mut Formatter<'_>, indent: usize) -> std::fmt::Result {
        write!(f, "{:indent$}", "")?;
        match self {
            IqTree::True => f.write_str("TRUE")?,
            IqTree::Empty { variables } => write!(f, "EMPTY {}", VariableList(variables))?,
            IqTree::IntensionalData { atom } => write!(f, "INTENSIONAL {atom}")?,
            IqTree::Construction {
                projected,
                substitution,
                ..
            } => write!(f, "CONSTRUCT {} {substitution}", VariableList(projected))?,
            IqTree::Filter { condition, .. } => write!(f, "FILTER {condition}")?,
            IqTree::Distinct { .. } => f.write_str("DISTINCT")?,
            IqTree::Slice { offset, limit, .. } => {
                write!(f, "SLICE offset={offset}")?;
                if let Some(limit) = limit {
                    write!(f, " limit={limit}")?;
                }
            }
            IqTree::OrderBy { comparators, .. } => {
                let comparators = comparators.iter().map(|c| {
                    let direction = if c.ascending { "ASC" } else { "DESC" };
                    format!("{direction}({})", c.term)
                });
                write!(f, "ORDER BY [{}]", comparators.format(", "))?;
            }
            IqTree::Aggregation {
                grouping,
                substitution,
                ..
            } => write!(f, "AGGREGATE {} {substitution}", VariableList(grouping))?,
            IqTree::InnerJoin { condition, .. } => {
                f.write_str("JOIN")?;
                if let Some(condition) = condition {
                    write!(f, " {condition}")?;
                }
            }
            IqTree::LeftJoin { condition, .. } => {
                f.write_str("LJ")?;
                if let Some(condition) = condition {
                    write!(f, " {condition}")?;
                }
            }
            IqTree::Union { variables, .. } => write!(f, "UNION {}", VariableList(variables))?,
        }

        for child in self.children() {
            f.write_str("\n")?;
            child.fmt_indented(f, indent + 2)?;
        }
        Ok(())
    }

    /// Returns the direct children of this node.
    pub fn children(&self) -> Vec<&IqTree> {
        match self {
            IqTree::True | IqTree::Empty { .. } | IqTree::IntensionalData { .. } => Vec::new(),
            IqTree::Construction { child, .. }
            | IqTree::Filter { child, .. }
            | IqTree::Distinct { child }
            | IqTree::Slice { child, .. }
            | IqTree::OrderBy { child, .. }
            | IqTree::Aggregation { child, .. } => vec![child.as_ref()],
            IqTree::InnerJoin { children, .. } | IqTree::Union { children, .. } => {
                children.iter().collect()
            }
            IqTree::LeftJoin { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        }
    }
}

struct VariableList<'variables>(&'variables BTreeSet<Variable>);

impl Display for VariableList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}
