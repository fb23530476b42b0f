use crate::test_utils::{iri, triple, var, variable, variables};
use sparql_iq_logical::{
    AtomPredicate, Iq, IqError, IqResult, IqTree, OrderComparator, ProjectionAtom,
};
use sparql_iq_model::{
    AggregateFunction, AggregateKind, FunctionSymbol, Substitution, Term,
};

#[test]
fn test_construction_over_data() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let tree = IqTree::construction(variables(["s"]), Substitution::empty(), data)?;
    let tree = IqTree::slice(2, Some(5), tree);

    insta::assert_snapshot!(tree, @r"
    SLICE offset=2 limit=5
      CONSTRUCT [?s] {}
        INTENSIONAL triple(?s, ?p, ?o)
    ");
    assert_eq!(tree.projected_variables(), variables(["s"]));
    assert_eq!(tree.known_variables(), variables(["o", "p", "s"]));
    assert_eq!(tree.non_projected_variables(), variables(["o", "p"]));
    Ok(())
}

#[test]
fn test_construction_rejects_unprovided_variable() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let result = IqTree::construction(variables(["s", "x"]), Substitution::empty(), data);
    assert!(matches!(result, Err(IqError::InvalidNode { .. })));
    Ok(())
}

#[test]
fn test_construction_rejects_redefinition() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let substitution = [(variable("s"), Term::null())].into_iter().collect();
    let result = IqTree::construction(variables(["p", "s"]), substitution, data);
    assert!(matches!(result, Err(IqError::InvalidNode { .. })));
    Ok(())
}

#[test]
fn test_union_requires_same_variables() -> IqResult<()> {
    let lhs = triple(var("s"), iri("http://example.com/a"), var("x"))?;
    let rhs = triple(var("s"), iri("http://example.com/b"), var("y"))?;
    let result = IqTree::union(variables(["s", "x"]), vec![lhs, rhs]);
    assert!(matches!(result, Err(IqError::InvalidNode { .. })));
    Ok(())
}

#[test]
fn test_left_join_with_condition() -> IqResult<()> {
    let lhs = triple(var("s"), iri("http://example.com/a"), var("x"))?;
    let rhs = triple(var("s"), iri("http://example.com/b"), var("y"))?;
    let condition = Term::function(FunctionSymbol::Equal, vec![var("x"), var("y")])?;
    let tree = IqTree::left_join(Some(condition), lhs, rhs)?;

    insta::assert_snapshot!(tree, @r"
    LJ EQ(?x, ?y)
      INTENSIONAL triple(?s, <http://example.com/a>, ?x)
      INTENSIONAL triple(?s, <http://example.com/b>, ?y)
    ");
    assert_eq!(tree.projected_variables(), variables(["s", "x", "y"]));
    Ok(())
}

#[test]
fn test_filter_rejects_unknown_variable() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let result = IqTree::filter(Term::is_null_of(var("z")), data);
    assert!(matches!(result, Err(IqError::InvalidNode { .. })));
    Ok(())
}

#[test]
fn test_aggregation() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let count = Term::function(
        FunctionSymbol::Aggregate(AggregateFunction::new(AggregateKind::Count, false)),
        vec![],
    )?;
    let substitution = [(variable("c"), count)].into_iter().collect();
    let tree = IqTree::aggregation(variables(["s"]), substitution, data)?;

    insta::assert_snapshot!(tree, @r"
    AGGREGATE [?s] {?c/COUNT()}
      INTENSIONAL triple(?s, ?p, ?o)
    ");
    assert_eq!(tree.projected_variables(), variables(["c", "s"]));
    Ok(())
}

#[test]
fn test_aggregation_rejects_non_aggregates() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let substitution = [(variable("c"), Term::is_null_of(var("o")))]
        .into_iter()
        .collect();
    let result = IqTree::aggregation(variables(["s"]), substitution, data);
    assert!(matches!(result, Err(IqError::InvalidNode { .. })));
    Ok(())
}

#[test]
fn test_order_by() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let tree = IqTree::order_by(
        vec![
            OrderComparator::new(var("o"), false),
            OrderComparator::new(var("s"), true),
        ],
        data,
    )?;

    insta::assert_snapshot!(tree, @r"
    ORDER BY [DESC(?o), ASC(?s)]
      INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_iq_projection_atom_must_match() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let atom = ProjectionAtom::try_new(AtomPredicate::Answer, vec![variable("s")])?;
    let result = Iq::try_new(atom, data);
    assert!(matches!(result, Err(IqError::ProjectionMismatch { .. })));
    Ok(())
}

#[test]
fn test_iq_display() -> IqResult<()> {
    let data = triple(var("s"), var("p"), var("o"))?;
    let atom = ProjectionAtom::try_new(
        AtomPredicate::Answer,
        vec![variable("o"), variable("p"), variable("s")],
    )?;
    let iq = Iq::try_new(atom, data)?;

    insta::assert_snapshot!(iq, @r"
    ans(?o, ?p, ?s)
    INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}
