mod constant;
mod evaluation;
mod function_symbol;

pub use constant::{Constant, NumericValue};
pub use function_symbol::{AggregateFunction, AggregateKind, Arity, BuiltinFunction, FunctionSymbol};

use crate::{ModelError, ModelResult, Variable};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A term of the IQ algebra.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
    Function(FunctionalTerm),
}

/// A function symbol applied to an ordered list of arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionalTerm {
    symbol: FunctionSymbol,
    arguments: Vec<Term>,
}

impl FunctionalTerm {
    /// Creates a new [FunctionalTerm], checking the arity of `symbol`.
    pub fn try_new(symbol: FunctionSymbol, arguments: Vec<Term>) -> ModelResult<Self> {
        let arity = symbol.arity();
        if !arity.accepts(arguments.len()) {
            return Err(ModelError::ArityMismatch {
                symbol: symbol.to_string(),
                expected: arity,
                actual: arguments.len(),
            });
        }
        Ok(Self { symbol, arguments })
    }

    /// Creates a new [FunctionalTerm] without checking the arity of `symbol`.
    ///
    /// Only use this if the number of arguments is known to be correct.
    pub fn new_unchecked(symbol: FunctionSymbol, arguments: Vec<Term>) -> Self {
        Self { symbol, arguments }
    }

    pub fn symbol(&self) -> &FunctionSymbol {
        &self.symbol
    }

    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }
}

impl Term {
    pub fn null() -> Self {
        Term::Constant(Constant::Null)
    }

    pub fn boolean(value: bool) -> Self {
        Term::Constant(Constant::boolean(value))
    }

    /// Creates a term from a function symbol, checking its arity.
    pub fn function(symbol: FunctionSymbol, arguments: Vec<Term>) -> ModelResult<Self> {
        FunctionalTerm::try_new(symbol, arguments).map(Term::Function)
    }

    pub fn not(inner: Term) -> Self {
        Term::Function(FunctionalTerm::new_unchecked(FunctionSymbol::Not, vec![inner]))
    }

    pub fn is_null_of(inner: Term) -> Self {
        Term::Function(FunctionalTerm::new_unchecked(
            FunctionSymbol::IsNull,
            vec![inner],
        ))
    }

    pub fn strict_equality(lhs: Term, rhs: Term) -> Self {
        Term::Function(FunctionalTerm::new_unchecked(
            FunctionSymbol::StrictEquality,
            vec![lhs, rhs],
        ))
    }

    pub fn coalesce(arguments: Vec<Term>) -> ModelResult<Self> {
        Term::function(FunctionSymbol::Coalesce, arguments)
    }

    /// Combines `terms` with a flat `AND`. Returns [None] if there are no terms.
    pub fn conjunction(terms: impl IntoIterator<Item = Term>) -> Option<Term> {
        Self::flat_connective(FunctionSymbol::And, terms)
    }

    /// Combines `terms` with a flat `OR`. Returns [None] if there are no terms.
    pub fn disjunction(terms: impl IntoIterator<Item = Term>) -> Option<Term> {
        Self::flat_connective(FunctionSymbol::Or, terms)
    }

    fn flat_connective(symbol: FunctionSymbol, terms: impl IntoIterator<Item = Term>) -> Option<Term> {
        let mut operands = Vec::new();
        for term in terms {
            match term {
                Term::Function(inner) if inner.symbol == symbol => {
                    operands.extend(inner.arguments);
                }
                other => operands.push(other),
            }
        }

        match operands.len() {
            0 => None,
            1 => operands.pop(),
            _ => Some(Term::Function(FunctionalTerm::new_unchecked(symbol, operands))),
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Term::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Term::Constant(constant) => Some(constant),
            _ => None,
        }
    }

    pub fn as_functional_term(&self) -> Option<&FunctionalTerm> {
        match self {
            Term::Function(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Term::Constant(Constant::Null))
    }

    /// Returns whether the term contains no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Function(inner) => inner.arguments.iter().all(Term::is_ground),
        }
    }

    /// Returns whether the NULL constant occurs anywhere in the term.
    pub fn contains_null(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(constant) => constant.is_null(),
            Term::Function(inner) => inner.arguments.iter().any(Term::contains_null),
        }
    }

    /// Returns whether the term evaluates to an `xsd:boolean` (or NULL).
    pub fn is_boolean_typed(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(constant) => constant.is_null() || constant.as_boolean().is_some(),
            Term::Function(inner) => inner.symbol.returns_boolean(),
        }
    }

    /// Returns all variables that occur in the term.
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut result = BTreeSet::new();
        self.collect_variables(&mut result);
        result
    }

    pub(crate) fn collect_variables(&self, result: &mut BTreeSet<Variable>) {
        match self {
            Term::Variable(variable) => {
                result.insert(variable.clone());
            }
            Term::Constant(_) => {}
            Term::Function(inner) => {
                for argument in &inner.arguments {
                    argument.collect_variables(result);
                }
            }
        }
    }

    /// Returns whether any of the `variables` occurs in the term.
    pub fn mentions_any(&self, variables: &BTreeSet<Variable>) -> bool {
        match self {
            Term::Variable(variable) => variables.contains(variable),
            Term::Constant(_) => false,
            Term::Function(inner) => inner.arguments.iter().any(|a| a.mentions_any(variables)),
        }
    }

    /// Replaces every variable with the result of `f`.
    pub fn map_variables(&self, f: &impl Fn(&Variable) -> Term) -> Term {
        match self {
            Term::Variable(variable) => f(variable),
            Term::Constant(_) => self.clone(),
            Term::Function(inner) => Term::Function(FunctionalTerm {
                symbol: inner.symbol.clone(),
                arguments: inner
                    .arguments
                    .iter()
                    .map(|argument| argument.map_variables(f))
                    .collect(),
            }),
        }
    }
}

impl From<Variable> for Term {
    fn from(value: Variable) -> Self {
        Term::Variable(value)
    }
}

impl From<Constant> for Term {
    fn from(value: Constant) -> Self {
        Term::Constant(value)
    }
}

impl From<FunctionalTerm> for Term {
    fn from(value: FunctionalTerm) -> Self {
        Term::Function(value)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Variable(variable) => write!(f, "{variable}"),
            Term::Constant(constant) => write!(f, "{constant}"),
            Term::Function(inner) => write!(f, "{inner}"),
        }
    }
}

impl Display for FunctionalTerm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.symbol, self.arguments.iter().join(", "))
    }
}
