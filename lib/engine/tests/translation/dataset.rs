use crate::test_utils::{iri, translate, translate_with};
use sparql_iq_common::{DatasetClause, ExternalBindings};
use sparql_iq_engine::sparql::{TranslationError, TranslationOptions};

#[test]
fn test_single_default_graph() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s ?o FROM <http://e/g1> WHERE { ?s <http://e/p> ?o }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?o)
    INTENSIONAL quad(?s, <http://e/p>, ?o, <http://e/g1>)
    ");
    Ok(())
}

#[test]
fn test_multiple_default_graphs_are_merged() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s FROM <http://e/g1> FROM <http://e/g2> WHERE { ?s <http://e/p> ?o }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      DISTINCT
        CONSTRUCT [?o, ?s] {}
          FILTER OR(STRICT_EQ(?gf0, <http://e/g1>), STRICT_EQ(?gf0, <http://e/g2>))
            INTENSIONAL quad(?s, <http://e/p>, ?o, ?gf0)
    ");
    Ok(())
}

#[test]
fn test_named_graphs_only_imply_empty_default_graph() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s FROM NAMED <http://e/g1> WHERE { ?s <http://e/p> ?o }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      EMPTY [?o, ?s]
    ");
    Ok(())
}

#[test]
fn test_graph_variable() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s ?g WHERE { GRAPH ?g { ?s <http://e/p> ?o } }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?g)
    CONSTRUCT [?g, ?s] {}
      INTENSIONAL quad(?s, <http://e/p>, ?o, ?g)
    ");
    Ok(())
}

#[test]
fn test_graph_variable_restricted_to_named_graphs() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s ?g FROM NAMED <http://e/g1> WHERE { GRAPH ?g { ?s <http://e/p> ?o } }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?g)
    CONSTRUCT [?g, ?s] {}
      FILTER STRICT_EQ(?g, <http://e/g1>)
        INTENSIONAL quad(?s, <http://e/p>, ?o, ?g)
    ");
    Ok(())
}

#[test]
fn test_graph_constant_in_named_graphs() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s FROM NAMED <http://e/g1> WHERE { GRAPH <http://e/g1> { ?s <http://e/p> ?o } }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      INTENSIONAL quad(?s, <http://e/p>, ?o, <http://e/g1>)
    ");
    Ok(())
}

#[test]
fn test_graph_constant_not_in_named_graphs() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s FROM NAMED <http://e/g1> WHERE { GRAPH <http://e/g2> { ?s <http://e/p> ?o } }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      EMPTY [?o, ?s]
    ");
    Ok(())
}

#[test]
fn test_graph_pattern_restores_default_graph() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s ?g ?x WHERE { GRAPH ?g { ?s <http://e/p> ?o } ?s <http://e/q> ?x }",
    )?;
    let rendered = iq.to_string();
    assert!(rendered.contains("quad(?s, <http://e/p>"), "{rendered}");
    assert!(rendered.contains("triple(?s, <http://e/q>, ?x)"), "{rendered}");
    Ok(())
}

#[test]
fn test_default_dataset_from_options() -> Result<(), TranslationError> {
    let options = TranslationOptions::default()
        .with_default_dataset(DatasetClause::new(vec![iri("http://e/g1")], None));
    let iq = translate_with(
        "SELECT ?s ?o WHERE { ?s <http://e/p> ?o }",
        options.clone(),
        &ExternalBindings::empty(),
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?o)
    INTENSIONAL quad(?s, <http://e/p>, ?o, <http://e/g1>)
    ");

    // The dataset of the query takes precedence.
    let iq = translate_with(
        "SELECT ?s ?o FROM <http://e/g2> WHERE { ?s <http://e/p> ?o }",
        options,
        &ExternalBindings::empty(),
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?o)
    INTENSIONAL quad(?s, <http://e/p>, ?o, <http://e/g2>)
    ");
    Ok(())
}
