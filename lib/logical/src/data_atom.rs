use crate::{IqError, IqResult};
use itertools::Itertools;
use sparql_iq_model::{InjectiveSubstitution, Term, Variable};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// The predicate of a [DataAtom] or a [ProjectionAtom].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AtomPredicate {
    /// A triple in the default graph.
    Triple,
    /// A triple in a named graph. The graph is the last argument.
    Quad,
    /// The answer of a query.
    Answer,
}

impl AtomPredicate {
    /// Returns the number of arguments, if fixed.
    pub fn arity(self) -> Option<usize> {
        match self {
            AtomPredicate::Triple => Some(3),
            AtomPredicate::Quad => Some(4),
            AtomPredicate::Answer => None,
        }
    }
}

impl Display for AtomPredicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomPredicate::Triple => f.write_str("triple"),
            AtomPredicate::Quad => f.write_str("quad"),
            AtomPredicate::Answer => f.write_str("ans"),
        }
    }
}

/// A pattern over the data that has yet to be resolved against a mapping.
///
/// The arguments are either variables or constants.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DataAtom {
    predicate: AtomPredicate,
    arguments: Vec<Term>,
}

impl DataAtom {
    /// Creates a new [DataAtom], checking the arity of the predicate and that no argument is a
    /// functional term.
    pub fn try_new(predicate: AtomPredicate, arguments: Vec<Term>) -> IqResult<Self> {
        if predicate.arity().is_some_and(|arity| arity != arguments.len()) {
            return Err(IqError::InvalidAtom(format!(
                "{predicate} does not accept {} arguments",
                arguments.len()
            )));
        }
        if let Some(argument) = arguments.iter().find(|a| matches!(a, Term::Function(_))) {
            return Err(IqError::InvalidAtom(format!(
                "{argument} is not a variable or a constant"
            )));
        }
        Ok(Self {
            predicate,
            arguments,
        })
    }

    pub fn predicate(&self) -> AtomPredicate {
        self.predicate
    }

    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }

    pub fn variables(&self) -> BTreeSet<Variable> {
        self.arguments
            .iter()
            .filter_map(Term::as_variable)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn rename(&self, renaming: &InjectiveSubstitution) -> DataAtom {
        Self {
            predicate: self.predicate,
            arguments: self.arguments.iter().map(|a| renaming.apply(a)).collect(),
        }
    }
}

impl Display for DataAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.predicate, self.arguments.iter().join(", "))
    }
}

/// An atom whose arguments are distinct variables. Used as the head of an [Iq](crate::Iq).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProjectionAtom {
    predicate: AtomPredicate,
    variables: Vec<Variable>,
}

impl ProjectionAtom {
    pub fn try_new(predicate: AtomPredicate, variables: Vec<Variable>) -> IqResult<Self> {
        if predicate
            .arity()
            .is_some_and(|arity| arity != variables.len())
        {
            return Err(IqError::InvalidAtom(format!(
                "{predicate} does not accept {} arguments",
                variables.len()
            )));
        }
        if !variables.iter().all_unique() {
            return Err(IqError::InvalidAtom(format!(
                "the variables of {predicate}({}) are not distinct",
                variables.iter().join(", ")
            )));
        }
        Ok(Self {
            predicate,
            variables,
        })
    }

    pub fn predicate(&self) -> AtomPredicate {
        self.predicate
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
}

impl Display for ProjectionAtom {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.predicate, self.variables.iter().join(", "))
    }
}
