use crate::test_utils::{iri, translate, translate_with};
use sparql_iq_common::ExternalBindings;
use sparql_iq_engine::sparql::{TranslationError, TranslationOptions};
use sparql_iq_model::Variable;

#[test]
fn test_filter_false_yields_empty_tree() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(false) }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      EMPTY [?o, ?p, ?s]
    ");
    Ok(())
}

#[test]
fn test_filter_true_is_dropped() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(true) }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_less_or_equal_is_negated_greater_than() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(?o <= ?p) }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      FILTER NOT(GT(?o, ?p))
        INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_large_integer_comparison_is_folded_exactly() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?s WHERE { ?s ?p ?o FILTER(9007199254740993 > 9007199254740992) }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      INTENSIONAL triple(?s, ?p, ?o)
    ");

    let iq = translate(
        "SELECT ?s WHERE { ?s ?p ?o FILTER(9007199254740993 = 9007199254740992) }",
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      EMPTY [?o, ?p, ?s]
    ");
    Ok(())
}

#[test]
fn test_in_is_a_disjunction() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(?o IN (<http://e/a>, <http://e/b>)) }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      FILTER OR(EQ(?o, <http://e/a>), EQ(?o, <http://e/b>))
        INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_empty_in_is_false() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(?o IN ()) }")?;
    assert!(iq.tree().to_string().contains("EMPTY"), "{iq}");
    Ok(())
}

#[test]
fn test_bound_of_unknown_variable_is_false() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(BOUND(?z)) }")?;
    assert!(iq.tree().to_string().contains("EMPTY"), "{iq}");
    Ok(())
}

#[test]
fn test_non_boolean_condition_uses_effective_boolean_value() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(?o) }")?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      FILTER EBV(?o)
        INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_unknown_variable_resolves_to_external_binding() -> Result<(), TranslationError> {
    let bindings =
        ExternalBindings::empty().with_binding(Variable::new_unchecked("z"), iri("http://e/x"));
    let iq = translate_with(
        "SELECT ?s WHERE { ?s ?p ?o FILTER(sameTerm(?o, ?z)) }",
        TranslationOptions::default(),
        &bindings,
    )?;
    insta::assert_snapshot!(iq, @r"
    ans(?s)
    CONSTRUCT [?s] {}
      FILTER SAME_TERM(?o, <http://e/x>)
        INTENSIONAL triple(?s, ?p, ?o)
    ");
    Ok(())
}

#[test]
fn test_xsd_function_is_a_cast() -> Result<(), TranslationError> {
    let iq = translate(
        "SELECT ?i WHERE { ?s ?p ?o BIND(<http://www.w3.org/2001/XMLSchema#integer>(?o) AS ?i) }",
    )?;
    let rendered = iq.to_string();
    assert!(
        rendered.contains("CAST<http://www.w3.org/2001/XMLSchema#integer>(?o)"),
        "{rendered}"
    );
    Ok(())
}

#[test]
fn test_builtin_functions() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?l WHERE { ?s ?p ?o BIND(STRLEN(UCASE(STR(?o))) AS ?l) }")?;
    let rendered = iq.to_string();
    assert!(rendered.contains("{?l/STRLEN(UCASE(STR(?o)))}"), "{rendered}");
    Ok(())
}

#[test]
fn test_exists_is_unsupported() {
    let result = translate("SELECT ?s WHERE { ?s ?p ?o FILTER EXISTS { ?o ?p ?s } }");
    assert!(
        matches!(result, Err(TranslationError::Unsupported(_))),
        "unexpected result {result:?}"
    );
}

#[test]
fn test_custom_function_is_unsupported() {
    let result = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(<http://e/f>(?o)) }");
    assert!(
        matches!(result, Err(TranslationError::Unsupported(_))),
        "unexpected result {result:?}"
    );
}

#[test]
fn test_lang_of_complex_expression_is_unsupported() {
    let result = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(LANG(STR(?o)) = \"en\") }");
    assert!(
        matches!(result, Err(TranslationError::Unsupported(_))),
        "unexpected result {result:?}"
    );
}

#[test]
fn test_lang_matches() -> Result<(), TranslationError> {
    let iq = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(langMatches(LANG(?o), \"en\")) }")?;
    let rendered = iq.to_string();
    assert!(rendered.contains("LANG_MATCHES(LANG(?o), \"en\")"), "{rendered}");
    Ok(())
}

#[test]
fn test_lang_matches_with_unbound_range_is_unsupported() {
    let result = translate("SELECT ?s WHERE { ?s ?p ?o FILTER(langMatches(LANG(?o), ?r)) }");
    assert!(
        matches!(result, Err(TranslationError::Unsupported(_))),
        "unexpected result {result:?}"
    );
}

#[test]
fn test_invalid_literal() -> Result<(), TranslationError> {
    let query = "SELECT ?s WHERE { ?s ?p ?o \
        FILTER(?o = \"abc\"^^<http://www.w3.org/2001/XMLSchema#integer>) }";
    let result = translate(query);
    assert!(
        matches!(result, Err(TranslationError::InvalidQuery(_))),
        "unexpected result {result:?}"
    );

    let options = TranslationOptions::default().with_literal_validation(false);
    translate_with(query, options, &ExternalBindings::empty())?;
    Ok(())
}
