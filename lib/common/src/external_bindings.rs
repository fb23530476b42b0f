use sparql_iq_model::{Constant, Variable};
use std::collections::btree_map::Iter;
use std::collections::{BTreeMap, BTreeSet};

/// Values for variables that are fixed before a query is translated (e.g., query parameters).
///
/// External bindings are not substituted into the query. The translator adds equality filters
/// instead such that the shape of the query stays the same regardless of the bound values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalBindings {
    bindings: BTreeMap<Variable, Constant>,
}

impl ExternalBindings {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a binding for `variable`, replacing a previous one.
    #[must_use]
    pub fn with_binding(mut self, variable: Variable, value: impl Into<Constant>) -> Self {
        self.bindings.insert(variable, value.into());
        self
    }

    pub fn get(&self, variable: &Variable) -> Option<&Constant> {
        self.bindings.get(variable)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.bindings.keys()
    }

    pub fn iter(&self) -> Iter<'_, Variable, Constant> {
        self.bindings.iter()
    }

    /// Returns the bindings for the given `variables`, ordered by variable.
    pub fn restrict_to<'bindings>(
        &'bindings self,
        variables: &'bindings BTreeSet<Variable>,
    ) -> impl Iterator<Item = (&'bindings Variable, &'bindings Constant)> {
        self.bindings
            .iter()
            .filter(move |(variable, _)| variables.contains(*variable))
    }
}

impl FromIterator<(Variable, Constant)> for ExternalBindings {
    fn from_iter<T: IntoIterator<Item = (Variable, Constant)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl<'bindings> IntoIterator for &'bindings ExternalBindings {
    type Item = (&'bindings Variable, &'bindings Constant);
    type IntoIter = Iter<'bindings, Variable, Constant>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}
