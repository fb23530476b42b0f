use crate::{ModelError, ModelResult, Term, Variable};
use itertools::Itertools;
use std::collections::btree_map::Iter;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// An immutable mapping from variables to terms.
///
/// A substitution never maps a variable to itself. Such entries are dropped on construction.
/// The entries are ordered by variable name, which makes the rendering of trees deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Substitution {
    entries: BTreeMap<Variable, Term>,
}

impl Substitution {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.entries.get(variable)
    }

    pub fn is_defining(&self, variable: &Variable) -> bool {
        self.entries.contains_key(variable)
    }

    pub fn iter(&self) -> Iter<'_, Variable, Term> {
        self.entries.iter()
    }

    pub fn domain(&self) -> BTreeSet<Variable> {
        self.entries.keys().cloned().collect()
    }

    /// Returns the variables that occur in any of the terms of this substitution.
    pub fn range_variables(&self) -> BTreeSet<Variable> {
        let mut result = BTreeSet::new();
        for term in self.entries.values() {
            term.collect_variables(&mut result);
        }
        result
    }

    /// Applies the substitution to a single variable.
    pub fn apply_to_variable(&self, variable: &Variable) -> Term {
        self.entries
            .get(variable)
            .cloned()
            .unwrap_or_else(|| Term::Variable(variable.clone()))
    }

    /// Applies the substitution to `term`.
    ///
    /// The application is not recursive. Variables introduced by the substitution are not
    /// substituted again.
    pub fn apply(&self, term: &Term) -> Term {
        if self.is_empty() {
            return term.clone();
        }
        term.map_variables(&|variable| self.apply_to_variable(variable))
    }

    /// Computes `self ∘ other`, i.e., the substitution that first applies `other` and then `self`.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let from_other = other
            .entries
            .iter()
            .map(|(variable, term)| (variable.clone(), self.apply(term)));
        let from_self = self
            .entries
            .iter()
            .filter(|(variable, _)| !other.is_defining(variable))
            .map(|(variable, term)| (variable.clone(), term.clone()));
        from_other.chain(from_self).collect()
    }

    #[must_use]
    pub fn restrict_domain_to(&self, variables: &BTreeSet<Variable>) -> Substitution {
        self.filter_entries(|variable| variables.contains(variable))
    }

    #[must_use]
    pub fn remove_from_domain(&self, variables: &BTreeSet<Variable>) -> Substitution {
        self.filter_entries(|variable| !variables.contains(variable))
    }

    fn filter_entries(&self, predicate: impl Fn(&Variable) -> bool) -> Substitution {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(variable, _)| predicate(variable))
                .map(|(variable, term)| (variable.clone(), term.clone()))
                .collect(),
        }
    }

    /// Merges two substitutions. Returns [None] if they define a shared variable differently.
    pub fn union(&self, other: &Substitution) -> Option<Substitution> {
        self.try_union(other).ok()
    }

    /// Same as [Self::union] but reports the conflicting variable.
    pub fn try_union(&self, other: &Substitution) -> ModelResult<Substitution> {
        let mut entries = self.entries.clone();
        for (variable, term) in &other.entries {
            match entries.get(variable) {
                Some(existing) if existing != term => {
                    return Err(ModelError::ConflictingDefinitions(variable.clone()));
                }
                Some(_) => {}
                None => {
                    entries.insert(variable.clone(), term.clone());
                }
            }
        }
        Ok(Self { entries })
    }

    /// Applies `f` to every term of the substitution.
    pub fn try_map_terms<E>(
        &self,
        f: impl Fn(&Term) -> Result<Term, E>,
    ) -> Result<Substitution, E> {
        self.entries
            .iter()
            .map(|(variable, term)| Ok((variable.clone(), f(term)?)))
            .collect()
    }
}

impl FromIterator<(Variable, Term)> for Substitution {
    fn from_iter<T: IntoIterator<Item = (Variable, Term)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .filter(|(variable, term)| term.as_variable() != Some(variable))
            .collect();
        Self { entries }
    }
}

impl<'substitution> IntoIterator for &'substitution Substitution {
    type Item = (&'substitution Variable, &'substitution Term);
    type IntoIter = Iter<'substitution, Variable, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Display for Substitution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.entries
                .iter()
                .map(|(variable, term)| format!("{variable}/{term}"))
                .join(", ")
        )
    }
}
