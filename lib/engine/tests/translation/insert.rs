use crate::test_utils::translate_insert;
use sparql_iq_engine::sparql::TranslationError;
use sparql_iq_logical::AtomPredicate;

#[test]
fn test_insert_binds_constants_to_fresh_variables() -> Result<(), TranslationError> {
    let iqs = translate_insert("INSERT { ?s <http://e/q> ?o } WHERE { ?s <http://e/p> ?o }")?;
    assert_eq!(iqs.len(), 1);
    insta::assert_snapshot!(iqs[0], @r"
    triple(?s, ?vf0, ?o)
    CONSTRUCT [?o, ?s, ?vf0] {?vf0/<http://e/q>}
      INTENSIONAL triple(?s, <http://e/p>, ?o)
    ");
    Ok(())
}

#[test]
fn test_insert_with_unbound_template_variable() -> Result<(), TranslationError> {
    let iqs = translate_insert("INSERT { ?s <http://e/q> ?z } WHERE { ?s <http://e/p> ?o }")?;
    insta::assert_snapshot!(iqs[0], @r"
    triple(?s, ?vf0, ?z)
    CONSTRUCT [?s, ?vf0, ?z] {?vf0/<http://e/q>, ?z/NULL}
      INTENSIONAL triple(?s, <http://e/p>, ?o)
    ");
    Ok(())
}

#[test]
fn test_insert_with_repeated_variable() -> Result<(), TranslationError> {
    let iqs = translate_insert("INSERT { ?s <http://e/q> ?s } WHERE { ?s <http://e/p> ?o }")?;
    insta::assert_snapshot!(iqs[0], @r"
    triple(?s, ?vf0, ?sf1)
    CONSTRUCT [?s, ?sf1, ?vf0] {?sf1/?s, ?vf0/<http://e/q>}
      INTENSIONAL triple(?s, <http://e/p>, ?o)
    ");
    Ok(())
}

#[test]
fn test_insert_blank_node_into_named_graph() -> Result<(), TranslationError> {
    let iqs = translate_insert(
        "INSERT { GRAPH <http://e/g> { _:b <http://e/q> ?o } } WHERE { ?s <http://e/p> ?o }",
    )?;
    assert_eq!(iqs.len(), 1);
    let iq = &iqs[0];
    assert_eq!(iq.projection_atom().predicate(), AtomPredicate::Quad);
    assert_eq!(iq.projection_atom().variables().len(), 4);
    let rendered = iq.to_string();
    assert!(rendered.contains("BNODE_TEMPLATE("), "{rendered}");
    assert!(rendered.contains("<http://e/g>"), "{rendered}");
    Ok(())
}

#[test]
fn test_insert_without_solutions() -> Result<(), TranslationError> {
    let iqs = translate_insert(
        "INSERT { ?s <http://e/q> ?o } WHERE { ?s <http://e/p> ?o FILTER(false) }",
    )?;
    assert!(iqs.is_empty());
    Ok(())
}

#[test]
fn test_insert_one_iq_per_template_atom() -> Result<(), TranslationError> {
    let iqs = translate_insert(
        "INSERT { ?s <http://e/q> ?o . ?o <http://e/r> ?s } WHERE { ?s <http://e/p> ?o }",
    )?;
    assert_eq!(iqs.len(), 2);
    Ok(())
}

#[test]
fn test_insert_using_graph() -> Result<(), TranslationError> {
    let iqs = translate_insert(
        "INSERT { ?s <http://e/q> ?o } USING <http://e/g> WHERE { ?s <http://e/p> ?o }",
    )?;
    insta::assert_snapshot!(iqs[0], @r"
    triple(?s, ?vf0, ?o)
    CONSTRUCT [?o, ?s, ?vf0] {?vf0/<http://e/q>}
      INTENSIONAL quad(?s, <http://e/p>, ?o, <http://e/g>)
    ");
    Ok(())
}

#[test]
fn test_delete_is_invalid() {
    let result = translate_insert(
        "DELETE { ?s ?p ?o } INSERT { ?s <http://e/q> ?o } WHERE { ?s ?p ?o }",
    );
    assert!(
        matches!(result, Err(TranslationError::InvalidQuery(_))),
        "unexpected result {result:?}"
    );
}
