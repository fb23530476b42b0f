use crate::{ModelError, ModelResult, Substitution, Term, Variable};
use itertools::Itertools;
use std::collections::btree_map::Iter;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

/// A renaming of variables that maps no two variables to the same variable.
///
/// Injective renamings are used to rename sub-trees apart. As the range variables are guaranteed to
/// be disjoint from a set of forbidden (i.e., already used) variables, applying the renaming to a
/// tree cannot capture any variable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct InjectiveSubstitution {
    entries: BTreeMap<Variable, Variable>,
}

impl InjectiveSubstitution {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a new renaming from `entries`. Identity entries are dropped.
    ///
    /// Fails if two variables are mapped to the same variable or if a range variable is in
    /// `forbidden`.
    pub fn try_new(
        entries: impl IntoIterator<Item = (Variable, Variable)>,
        forbidden: &BTreeSet<Variable>,
    ) -> ModelResult<Self> {
        let entries = entries
            .into_iter()
            .filter(|(source, target)| source != target)
            .collect::<BTreeMap<_, _>>();

        let mut range = BTreeSet::new();
        for target in entries.values() {
            if forbidden.contains(target) {
                return Err(ModelError::ForbiddenRangeVariable(target.clone()));
            }
            if !range.insert(target) {
                return Err(ModelError::NonInjectiveRenaming(target.clone()));
            }
        }

        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, variable: &Variable) -> Option<&Variable> {
        self.entries.get(variable)
    }

    pub fn iter(&self) -> Iter<'_, Variable, Variable> {
        self.entries.iter()
    }

    pub fn domain(&self) -> BTreeSet<Variable> {
        self.entries.keys().cloned().collect()
    }

    pub fn range(&self) -> BTreeSet<Variable> {
        self.entries.values().cloned().collect()
    }

    pub fn apply_to_variable(&self, variable: &Variable) -> Variable {
        self.entries
            .get(variable)
            .cloned()
            .unwrap_or_else(|| variable.clone())
    }

    pub fn apply(&self, term: &Term) -> Term {
        if self.is_empty() {
            return term.clone();
        }
        term.map_variables(&|variable| Term::Variable(self.apply_to_variable(variable)))
    }

    /// Applies the renaming to every variable of `variables`.
    pub fn apply_to_set(&self, variables: &BTreeSet<Variable>) -> BTreeSet<Variable> {
        variables
            .iter()
            .map(|variable| self.apply_to_variable(variable))
            .collect()
    }

    #[must_use]
    pub fn restrict_domain_to(&self, variables: &BTreeSet<Variable>) -> InjectiveSubstitution {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(variable, _)| variables.contains(*variable))
                .map(|(source, target)| (source.clone(), target.clone()))
                .collect(),
        }
    }

    /// Merges two renamings with disjoint domains into a single injective renaming.
    pub fn union(&self, other: &InjectiveSubstitution) -> ModelResult<InjectiveSubstitution> {
        if let Some(variable) = self.entries.keys().find(|v| other.entries.contains_key(*v)) {
            return Err(ModelError::ConflictingDefinitions(variable.clone()));
        }
        Self::try_new(
            self.entries
                .iter()
                .chain(other.entries.iter())
                .map(|(source, target)| (source.clone(), target.clone())),
            &BTreeSet::new(),
        )
    }

    /// Converts this renaming into a general [Substitution].
    pub fn to_substitution(&self) -> Substitution {
        self.entries
            .iter()
            .map(|(source, target)| (source.clone(), Term::Variable(target.clone())))
            .collect()
    }
}

impl<'substitution> IntoIterator for &'substitution InjectiveSubstitution {
    type Item = (&'substitution Variable, &'substitution Variable);
    type IntoIter = Iter<'substitution, Variable, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Display for InjectiveSubstitution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.entries
                .iter()
                .map(|(source, target)| format!("{source}/{target}"))
                .join(", ")
        )
    }
}
