use crate::test_utils::{
    iri, nullable_variables, translate, translate_with, variables, RecordingObserver,
};
use sparql_iq_common::{BlankNodeMode, ExternalBindings};
use sparql_iq_engine::sparql::{
    QueryTranslator, TranslationError, TranslationObserver, TranslationOptions,
};
use sparql_iq_logical::IqTree;
use sparql_iq_model::Variable;
use spargebra::Query;
use std::sync::Arc;

#[test]
fn test_select_with_limit_and_offset() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o } LIMIT 5 OFFSET 2")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    SLICE offset=2 limit=5
      CONSTRUCT [?s] {}
        INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_select_keeps_declared_variable_order() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?o ?s WHERE { ?s <http://e/p> ?o }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?o, ?s)
    INTENSIONAL triple(?s, <http://e/p>, ?o)
    ");
    Ok(())
}

#[test]
fn test_union_pads_with_null() -> Result<(), TranslationError> {
    let query = "SELECT ?s ?x ?y WHERE { { ?s <http://e/a> ?x } UNION { ?s <http://e/b> ?y } }";
    let iq = translate(query)?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?x, ?y)
    CONSTRUCT [?s, ?x, ?y] {}
      UNION [?s, ?x, ?y]
        CONSTRUCT [?s, ?x, ?y] {?y/NULL}
          INTENSIONAL triple(?s, <http://e/a>, ?x)
        CONSTRUCT [?s, ?x, ?y] {?x/NULL}
          INTENSIONAL triple(?s, <http://e/b>, ?y)
    ");
    assert_eq!(nullable_variables(query)?, variables(["x", "y"]));
    Ok(())
}

#[test]
fn test_optional_without_nullable_shared_variables() -> Result<(), TranslationError> {
    let query = "SELECT ?s ?n ?m WHERE { ?s <http://e/name> ?n OPTIONAL { ?s <http://e/mbox> ?m } }";
    let iq = translate(query)?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?n, ?m)
    LJ
      INTENSIONAL triple(?s, <http://e/name>, ?n)
      INTENSIONAL triple(?s, <http://e/mbox>, ?m)
    ");
    assert_eq!(nullable_variables(query)?, variables(["m"]));
    Ok(())
}

#[test]
fn test_optional_with_filter() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s ?x ?y WHERE { ?s <http://e/p> ?x OPTIONAL { ?s <http://e/q> ?y FILTER(?y != ?x) } }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?x, ?y)
    LJ NOT(EQ(?y, ?x))
      INTENSIONAL triple(?s, <http://e/p>, ?x)
      INTENSIONAL triple(?s, <http://e/q>, ?y)
    ");
    Ok(())
}

#[test]
fn test_optional_coalesces_nullable_shared_variable() -> Result<(), TranslationError> {
    let query = "SELECT ?s ?x ?y ?t WHERE { \
        ?s <http://e/p> ?x \
        OPTIONAL { ?s <http://e/q> ?y } \
        OPTIONAL { ?t <http://e/r> ?y } \
    }";
    let iq = translate(query)?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?x, ?y, ?t)
    CONSTRUCT [?s, ?t, ?x, ?y] {?y/COALESCE(?yf0, ?yf1)}
      LJ OR(STRICT_EQ(?yf0, ?yf1), IS_NULL(?yf0), IS_NULL(?yf1))
        LJ
          INTENSIONAL triple(?s, <http://e/p>, ?x)
          INTENSIONAL triple(?s, <http://e/q>, ?yf0)
        INTENSIONAL triple(?t, <http://e/r>, ?yf1)
    ");
    assert_eq!(nullable_variables(query)?, variables(["t", "y"]));
    Ok(())
}

#[test]
fn test_join_with_variable_bound_on_one_side_is_not_nullable() -> Result<(), TranslationError> {
    let query = "SELECT ?s ?y WHERE { \
        ?s <http://e/p> ?x \
        OPTIONAL { ?s <http://e/q> ?y } \
        ?y <http://e/r> ?z \
    }";
    let iq = translate(query)?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?y)
    CONSTRUCT [?s, ?y] {}
      CONSTRUCT [?s, ?x, ?y, ?z] {?y/COALESCE(?yf0, ?yf1)}
        JOIN OR(STRICT_EQ(?yf0, ?yf1), IS_NULL(?yf0), IS_NULL(?yf1))
          LJ
            INTENSIONAL triple(?s, <http://e/p>, ?x)
            INTENSIONAL triple(?s, <http://e/q>, ?yf0)
          INTENSIONAL triple(?yf1, <http://e/r>, ?z)
    ");
    assert!(nullable_variables(query)?.is_empty());
    Ok(())
}

#[test]
fn test_join_removes_shared_variables_from_nullable() -> Result<(), TranslationError> {
    let query = "SELECT ?s ?x WHERE { \
        { ?s <http://e/a> ?y OPTIONAL { ?s <http://e/p> ?x } } \
        { ?s <http://e/b> ?z OPTIONAL { ?s <http://e/q> ?x } } \
    }";
    let iq = translate(query)?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?x)
    CONSTRUCT [?s, ?x] {}
      CONSTRUCT [?s, ?x, ?y, ?z] {?x/COALESCE(?xf0, ?xf1)}
        JOIN OR(STRICT_EQ(?xf0, ?xf1), IS_NULL(?xf0), IS_NULL(?xf1))
          LJ
            INTENSIONAL triple(?s, <http://e/a>, ?y)
            INTENSIONAL triple(?s, <http://e/p>, ?xf0)
          LJ
            INTENSIONAL triple(?s, <http://e/b>, ?z)
            INTENSIONAL triple(?s, <http://e/q>, ?xf1)
    ");
    assert!(nullable_variables(query)?.is_empty());
    Ok(())
}

#[test]
fn test_values_with_undef() -> Result<(), TranslationError> {
    let query = "SELECT ?x ?y WHERE { \
        VALUES (?x ?y) { (<http://e/a> <http://e/b>) (UNDEF <http://e/c>) } \
    }";
    let iq = translate(query)?;
    insta::assert_snapshot!(iq, @r"
    ans(?x, ?y)
    UNION [?x, ?y]
      CONSTRUCT [?x, ?y] {?x/<http://e/a>, ?y/<http://e/b>}
        TRUE
      CONSTRUCT [?x, ?y] {?x/NULL, ?y/<http://e/c>}
        TRUE
    ");
    assert_eq!(nullable_variables(query)?, variables(["x"]));
    Ok(())
}

#[test]
fn test_values_without_rows() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?x WHERE { VALUES ?x { } }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?x)
    EMPTY [?x]
    ");
    Ok(())
}

#[test]
fn test_minus_is_an_anti_join() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s <http://e/a> ?x MINUS { ?s <http://e/b> ?y } }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      CONSTRUCT [?s, ?x] {}
        FILTER IS_NULL(?sf0)
          LJ STRICT_EQ(?s, ?sf0)
            INTENSIONAL triple(?s, <http://e/a>, ?x)
            INTENSIONAL triple(?sf0, <http://e/b>, ?y)
    ");
    Ok(())
}

#[test]
fn test_minus_without_shared_variables_is_identity() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s <http://e/a> ?x MINUS { ?t <http://e/b> ?y } }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      INTENSIONAL triple(?s, <http://e/a>, ?x)
    ");
    Ok(())
}

#[test]
fn test_sub_query_variables_are_renamed_apart() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s ?x WHERE { ?s <http://e/a> ?x . { SELECT ?s WHERE { ?s <http://e/b> ?x } } }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?x)
    JOIN
      INTENSIONAL triple(?s, <http://e/a>, ?x)
      CONSTRUCT [?s] {}
        INTENSIONAL triple(?s, <http://e/b>, ?xf0)
    ");
    Ok(())
}

#[test]
fn test_blank_nodes_in_body_are_variables() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s <http://e/p> _:b . _:b <http://e/q> ?o }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      JOIN
        INTENSIONAL triple(?s, <http://e/p>, ?bf0)
        INTENSIONAL triple(?bf0, <http://e/q>, ?o)
    ");
    Ok(())
}

#[test]
fn test_blank_nodes_as_constants() -> Result<(), TranslationError> {
    let options = TranslationOptions::default().with_blank_node_mode(BlankNodeMode::Constant);
    let iq = translate_with(
        "SELECT ?s WHERE { ?s <http://e/p> _:b }",
        options,
        &ExternalBindings::empty(),
    )?;
    let IqTree::Construction { child, .. } = iq.tree() else {
        panic!("unexpected tree {iq}");
    };
    let IqTree::IntensionalData { atom } = child.as_ref() else {
        panic!("unexpected tree {iq}");
    };
    assert!(atom.arguments()[2].as_constant().is_some());
    Ok(())
}

#[test]
fn test_bind_chain_is_grouped_by_dependencies() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s ?a ?b WHERE { ?s <http://e/p> ?o BIND(?o AS ?a) BIND(?a AS ?b) }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?a, ?b)
    CONSTRUCT [?a, ?b, ?s] {}
      CONSTRUCT [?a, ?b, ?o, ?s] {?b/?a}
        CONSTRUCT [?a, ?o, ?s] {?a/?o}
          INTENSIONAL triple(?s, <http://e/p>, ?o)
    ");
    Ok(())
}

#[test]
fn test_aggregation() -> Result<(), TranslationError> {
    let query = "SELECT ?s (COUNT(?o) AS ?c) (GROUP_CONCAT(?o) AS ?all) \
        WHERE { ?s <http://e/p> ?o } GROUP BY ?s";
    let iq = translate(query)?;
    let rendered = iq.to_string();
    assert!(rendered.contains("AGGREGATE [?s]"), "{rendered}");
    assert!(rendered.contains("GROUP_CONCAT[\" \"](?o)"), "{rendered}");
    assert_eq!(iq.projection_atom().to_string(), "ans(?s, ?c, ?all)");
    assert_eq!(nullable_variables(query)?, variables(["all"]));
    Ok(())
}

#[test]
fn test_grouping_by_unbound_variable() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?z (COUNT(*) AS ?c) WHERE { ?s ?p ?o } GROUP BY ?z")?;
    let rendered = iq.to_string();
    assert!(rendered.contains("{?z/NULL}"), "{rendered}");
    assert!(rendered.contains("COUNT()"), "{rendered}");
    Ok(())
}

#[test]
fn test_distinct_with_order_by() -> Result<(), TranslationError> {
    let iq = translate("SELECT DISTINCT ?s WHERE { ?s ?p ?o } ORDER BY DESC(?s)")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    DISTINCT
      CONSTRUCT [?s] {}
        ORDER BY [DESC(?s)]
          INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_order_by_unbound_variable_is_dropped() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o } ORDER BY ?z")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_ask() -> Result<(), TranslationError> {
    let iq = translate("ASK { ?s ?p ?o } LIMIT 1")?;
    insta::assert_snapshot!(iq, @r"
    ans()
    SLICE offset=0 limit=1
      CONSTRUCT [] {}
        INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_construct_projects_template_variables() -> Result<(), TranslationError> {
    let iq = translate(
        "CONSTRUCT { ?s <http://e/q> ?o . ?s <http://e/r> ?z } \
         WHERE { ?s <http://e/p> ?o . ?s <http://e/p2> ?x }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?o)
    CONSTRUCT [?o, ?s] {}
      JOIN
        INTENSIONAL triple(?s, <http://e/p>, ?o)
        INTENSIONAL triple(?s, <http://e/p2>, ?x)
    ");
    Ok(())
}

#[test]
fn test_describe_projects_in_scope_variables() -> Result<(), TranslationError> {
    let iq = translate("DESCRIBE ?s WHERE { ?s <http://e/p> ?o }")?;
    assert!(iq
        .projection_atom()
        .variables()
        .contains(&Variable::new_unchecked("s")));
    Ok(())
}

#[test]
fn test_external_binding_filters_leaf() -> Result<(), TranslationError> {
    let bindings =
        ExternalBindings::empty().with_binding(Variable::new_unchecked("o"), iri("http://e/x"));
    let iq = translate_with(
        "SELECT ?s ?o WHERE { ?s <http://e/p> ?o }",
        TranslationOptions::default(),
        &bindings,
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?o)
    FILTER STRICT_EQ(?o, <http://e/x>)
      INTENSIONAL triple(?s, <http://e/p>, ?o)
    ");
    Ok(())
}

#[test]
fn test_external_binding_of_projected_variable() -> Result<(), TranslationError> {
    let bindings =
        ExternalBindings::empty().with_binding(Variable::new_unchecked("z"), iri("http://e/x"));
    let iq = translate_with(
        "SELECT ?s ?z WHERE { ?s ?p ?o }",
        TranslationOptions::default(),
        &bindings,
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s, ?z)
    CONSTRUCT [?s, ?z] {?z/<http://e/x>}
      INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_observer_sees_every_graph_pattern() -> Result<(), TranslationError> {
    let recorder = Arc::new(RecordingObserver::default());
    let query = Query::parse("SELECT ?s WHERE { ?s ?p ?o } LIMIT 1", None).unwrap();
    QueryTranslator::new(TranslationOptions::default())
        .with_observer(Arc::clone(&recorder) as Arc<dyn TranslationObserver>)
        .translate_query(&query, &ExternalBindings::empty())?;

    assert_eq!(
        *recorder.entered.lock().unwrap(),
        vec!["slice", "project", "bgp"]
    );
    assert_eq!(
        *recorder.exited.lock().unwrap(),
        vec!["bgp", "project", "slice"]
    );
    Ok(())
}

#[test]
fn test_property_paths_are_unsupported() {
    let result = translate("SELECT ?s WHERE { ?s <http://e/p>+ ?o }");
    assert!(
        matches!(result, Err(TranslationError::Unsupported(_))),
        "unexpected result {result:?}"
    );
}

#[test]
fn test_service_is_unsupported() {
    let result = translate("SELECT ?s WHERE { SERVICE <http://e/sparql> { ?s ?p ?o } }");
    assert!(
        matches!(result, Err(TranslationError::Unsupported(_))),
        "unexpected result {result:?}"
    );
}
