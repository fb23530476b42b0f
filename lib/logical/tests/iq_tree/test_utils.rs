use sparql_iq_logical::{AtomPredicate, DataAtom, IqResult, IqTree};
use sparql_iq_model::{NamedNode, Term, Variable};
use std::collections::BTreeSet;

pub fn variable(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

pub fn var(name: &str) -> Term {
    Term::Variable(variable(name))
}

pub fn iri(value: &str) -> Term {
    Term::Constant(NamedNode::new_unchecked(value).into())
}

pub fn variables<const N: usize>(names: [&str; N]) -> BTreeSet<Variable> {
    names.into_iter().map(variable).collect()
}

/// Creates a `triple` leaf.
pub fn triple(subject: Term, predicate: Term, object: Term) -> IqResult<IqTree> {
    DataAtom::try_new(AtomPredicate::Triple, vec![subject, predicate, object])
        .map(IqTree::intensional)
}
