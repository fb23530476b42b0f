use sparql_iq_model::NamedNode;
use spargebra::algebra::QueryDataset;

/// The RDF dataset a query is evaluated against (i.e., `FROM` and `FROM NAMED`).
///
/// # Relevant Resources
/// - [SPARQL 1.1 - RDF Dataset](https://www.w3.org/TR/sparql11-query/#specifyingDataset)
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DatasetClause {
    default_graphs: Vec<NamedNode>,
    named_graphs: Option<Vec<NamedNode>>,
}

impl DatasetClause {
    pub fn new(default_graphs: Vec<NamedNode>, named_graphs: Option<Vec<NamedNode>>) -> Self {
        Self {
            default_graphs,
            named_graphs,
        }
    }

    /// The graphs that are merged into the default graph.
    pub fn default_graphs(&self) -> &[NamedNode] {
        &self.default_graphs
    }

    /// The graphs that are available to `GRAPH` patterns. [None] means that there is no
    /// restriction.
    pub fn available_named_graphs(&self) -> Option<&[NamedNode]> {
        self.named_graphs.as_deref()
    }

    /// Returns whether the clause does not restrict the dataset at all.
    pub fn is_unrestricted(&self) -> bool {
        self.default_graphs.is_empty()
            && self.named_graphs.as_ref().map_or(true, Vec::is_empty)
    }
}

impl From<&QueryDataset> for DatasetClause {
    fn from(value: &QueryDataset) -> Self {
        Self::new(value.default.clone(), value.named.clone())
    }
}
