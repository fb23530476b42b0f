use rustc_hash::FxHashSet;
use sparql_iq_model::{InjectiveSubstitution, ModelResult, Variable};
use std::collections::BTreeSet;

/// Creates fresh variables that are disjoint from all variables the generator knows about.
///
/// A generator is scoped to a single translation. Fresh variables are derived from an existing
/// name by appending `f` and a counter that is shared by all generated variables (e.g., `xf0`,
/// `yf1`). The generated names therefore only depend on the order of the requests.
#[derive(Clone, Debug, Default)]
pub struct VariableGenerator {
    known_variables: FxHashSet<Variable>,
    /// The variables created by this generator.
    generated: FxHashSet<Variable>,
    count: usize,
}

impl VariableGenerator {
    /// Creates a new generator that avoids `known_variables`.
    pub fn new(known_variables: impl IntoIterator<Item = Variable>) -> Self {
        Self {
            known_variables: known_variables.into_iter().collect(),
            generated: FxHashSet::default(),
            count: 0,
        }
    }

    /// Registers further variables that must be avoided.
    pub fn register_variables<'variable>(
        &mut self,
        variables: impl IntoIterator<Item = &'variable Variable>,
    ) {
        self.known_variables.extend(variables.into_iter().cloned());
    }

    pub fn is_known(&self, variable: &Variable) -> bool {
        self.known_variables.contains(variable)
    }

    /// Generates a fresh variable whose name is derived from `variable`.
    ///
    /// If `variable` has been generated by this generator, its suffix is replaced instead of
    /// extended.
    pub fn generate_new_variable_from(&mut self, variable: &Variable) -> Variable {
        let base = if self.generated.contains(variable) {
            strip_generated_suffix(variable.as_str())
        } else {
            variable.as_str()
        };
        loop {
            let candidate = Variable::new_unchecked(format!("{base}f{}", self.count));
            self.count += 1;
            if self.known_variables.insert(candidate.clone()) {
                self.generated.insert(candidate.clone());
                return candidate;
            }
        }
    }

    /// Generates a fresh variable with a neutral name.
    pub fn generate_new_variable(&mut self) -> Variable {
        self.generate_new_variable_from(&Variable::new_unchecked("v"))
    }

    /// Creates an injective renaming that maps each of `variables` to a fresh variable. The fresh
    /// variables are generated in the order of `variables`.
    pub fn create_injective_renaming(
        &mut self,
        variables: &BTreeSet<Variable>,
    ) -> ModelResult<InjectiveSubstitution> {
        let forbidden = self.known_variables.iter().cloned().collect::<BTreeSet<_>>();
        let entries = variables
            .iter()
            .map(|variable| (variable.clone(), self.generate_new_variable_from(variable)))
            .collect::<Vec<_>>();
        InjectiveSubstitution::try_new(entries, &forbidden)
    }
}

/// Removes the suffix `f<digits>` of a generated variable, such that generating a variable from a
/// generated variable does not nest the suffixes.
fn strip_generated_suffix(name: &str) -> &str {
    match name.rfind('f') {
        Some(index) if index > 0 => {
            let suffix = &name[index + 1..];
            if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) {
                &name[..index]
            } else {
                name
            }
        }
        _ => name,
    }
}
