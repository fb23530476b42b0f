use crate::{IqError, IqResult, IqTree, ProjectionAtom};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// An intermediate query: a projection atom (the head) over an [IqTree] (the body).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Iq {
    projection_atom: ProjectionAtom,
    tree: IqTree,
}

impl Iq {
    /// Creates a new [Iq]. The variables of the projection atom must be exactly the projected
    /// variables of the tree.
    pub fn try_new(projection_atom: ProjectionAtom, tree: IqTree) -> IqResult<Self> {
        let atom_variables = projection_atom
            .variables()
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>();
        let projected = tree.projected_variables();
        if atom_variables != projected {
            return Err(IqError::ProjectionMismatch {
                atom: projection_atom.to_string(),
                projected: format!("[{}]", projected.iter().join(", ")),
            });
        }
        Ok(Self {
            projection_atom,
            tree,
        })
    }

    pub fn projection_atom(&self) -> &ProjectionAtom {
        &self.projection_atom
    }

    pub fn tree(&self) -> &IqTree {
        &self.tree
    }
}

impl Display for Iq {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.projection_atom)?;
        write!(f, "{}", self.tree)
    }
}
