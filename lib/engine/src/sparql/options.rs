use sparql_iq_common::{BlankNodeMode, DatasetClause};

/// Options for translating SPARQL queries and updates.
#[derive(Clone, Debug)]
pub struct TranslationOptions {
    /// The dataset that is used if a query has no `FROM` (or an update no `USING`) clause. If
    /// [None], the triple patterns range over the whole store.
    pub default_dataset: Option<DatasetClause>,
    /// Whether literals with an invalid lexical form (e.g., `"abc"^^xsd:integer`) are rejected.
    pub validate_literals: bool,
    /// How blank nodes in query patterns are treated.
    pub blank_node_mode: BlankNodeMode,
    /// The separator of `GROUP_CONCAT` aggregates that do not specify one.
    pub default_group_concat_separator: String,
}

impl TranslationOptions {
    #[must_use]
    pub fn with_default_dataset(mut self, dataset: DatasetClause) -> Self {
        self.default_dataset = Some(dataset);
        self
    }

    #[must_use]
    pub fn with_literal_validation(mut self, validate_literals: bool) -> Self {
        self.validate_literals = validate_literals;
        self
    }

    #[must_use]
    pub fn with_blank_node_mode(mut self, blank_node_mode: BlankNodeMode) -> Self {
        self.blank_node_mode = blank_node_mode;
        self
    }
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            default_dataset: None,
            validate_literals: true,
            blank_node_mode: BlankNodeMode::default(),
            default_group_concat_separator: " ".to_owned(),
        }
    }
}
