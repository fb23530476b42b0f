use crate::sparql::error::{SparqlResult, TranslationError};
use crate::sparql::rewriting::graph_pattern_rewriter::ActiveGraph;
use crate::sparql::rewriting::join::SparqlJoinType;
use crate::sparql::rewriting::{GraphPatternRewriter, TranslationResult};
use sparql_iq_common::{BlankNodeMode, DatasetClause};
use sparql_iq_logical::{AtomPredicate, DataAtom, IqTree};
use sparql_iq_model::{
    validate_literal, BlankNode, Constant, GroundTerm, Literal, NamedNodePattern, Substitution,
    Term, TermPattern, TriplePattern, Variable,
};
use std::collections::BTreeSet;

impl GraphPatternRewriter<'_> {
    /// Translates a basic graph pattern into a join of its triple patterns.
    pub(super) fn rewrite_bgp(&self, patterns: &[TriplePattern]) -> SparqlResult<TranslationResult> {
        let mut results = patterns
            .iter()
            .map(|pattern| self.rewrite_triple_pattern(pattern));
        let Some(first) = results.next() else {
            return Ok(TranslationResult::non_nullable(IqTree::True));
        };
        results.try_fold(first?, |joined, next| {
            self.join(joined, next?, SparqlJoinType::Inner, None)
        })
    }

    fn rewrite_triple_pattern(&self, pattern: &TriplePattern) -> SparqlResult<TranslationResult> {
        let blank_node_mode = self.options.blank_node_mode;
        let subject = self.term_pattern(&pattern.subject, blank_node_mode)?;
        let predicate = named_node_pattern(&pattern.predicate);
        let object = self.term_pattern(&pattern.object, blank_node_mode)?;

        let active_graph = self.state.borrow().active_graph.clone();
        let tree = match active_graph {
            ActiveGraph::DefaultGraph => self.default_graph_leaf(subject, predicate, object)?,
            ActiveGraph::NamedGraph(graph) => {
                self.named_graph_leaf(subject, predicate, object, graph)?
            }
        };

        let variables = tree.projected_variables();
        self.with_external_binding_filter(TranslationResult::non_nullable(tree), &variables)
    }

    /// Creates the leaf of a triple pattern outside any `GRAPH` pattern.
    fn default_graph_leaf(
        &self,
        subject: Term,
        predicate: Term,
        object: Term,
    ) -> SparqlResult<IqTree> {
        let Some(dataset) = self
            .dataset
            .as_ref()
            .filter(|dataset| !dataset.is_unrestricted())
        else {
            let atom = DataAtom::try_new(AtomPredicate::Triple, vec![subject, predicate, object])?;
            return Ok(IqTree::intensional(atom));
        };

        match dataset.default_graphs() {
            [] => {
                let atom =
                    DataAtom::try_new(AtomPredicate::Triple, vec![subject, predicate, object])?;
                Ok(IqTree::empty(atom.variables()))
            }
            [graph] => {
                let graph = Term::Constant(Constant::Iri(graph.clone()));
                let atom =
                    DataAtom::try_new(AtomPredicate::Quad, vec![subject, predicate, object, graph])?;
                Ok(IqTree::intensional(atom))
            }
            graphs => {
                // The default graph is the merge of the listed graphs. The graph variable must not
                // leak out of the leaf, and a triple in multiple graphs must only be returned once.
                let graph_variable = self.generate_variable_from("g");
                let atom = DataAtom::try_new(
                    AtomPredicate::Quad,
                    vec![
                        subject,
                        predicate,
                        object,
                        Term::Variable(graph_variable.clone()),
                    ],
                )?;
                let mut variables = atom.variables();
                variables.remove(&graph_variable);

                let condition = Term::disjunction(graphs.iter().map(|graph| {
                    Term::strict_equality(
                        Term::Variable(graph_variable.clone()),
                        Term::Constant(Constant::Iri(graph.clone())),
                    )
                }));
                let leaf = IqTree::intensional(atom);
                let leaf = match condition {
                    Some(condition) => IqTree::filter(condition, leaf)?,
                    None => leaf,
                };
                let construction = IqTree::construction(variables, Substitution::empty(), leaf)?;
                Ok(IqTree::distinct(construction))
            }
        }
    }

    /// Creates the leaf of a triple pattern inside a `GRAPH` pattern.
    ///
    /// If the dataset lists named graphs, the graph term is restricted to these graphs.
    fn named_graph_leaf(
        &self,
        subject: Term,
        predicate: Term,
        object: Term,
        graph: Term,
    ) -> SparqlResult<IqTree> {
        let atom = DataAtom::try_new(
            AtomPredicate::Quad,
            vec![subject, predicate, object, graph.clone()],
        )?;
        let leaf = IqTree::intensional(atom);

        let named_graphs = self
            .dataset
            .as_ref()
            .and_then(DatasetClause::available_named_graphs)
            .filter(|graphs| !graphs.is_empty());
        let Some(named_graphs) = named_graphs else {
            return Ok(leaf);
        };

        let condition = Term::disjunction(named_graphs.iter().map(|named_graph| {
            Term::strict_equality(graph.clone(), Term::Constant(Constant::Iri(named_graph.clone())))
        }))
        .map(|condition| condition.simplify());
        let Some(condition) = condition else {
            return Ok(leaf);
        };
        if condition.as_boolean() == Some(true) {
            return Ok(leaf);
        }
        if condition.as_boolean() == Some(false) || condition.is_null() {
            return Ok(IqTree::empty(leaf.projected_variables()));
        }
        Ok(IqTree::filter(condition, leaf)?)
    }

    /// Restricts `variables` of `result` to their external values.
    pub(super) fn with_external_binding_filter(
        &self,
        result: TranslationResult,
        variables: &BTreeSet<Variable>,
    ) -> SparqlResult<TranslationResult> {
        let condition = Term::conjunction(self.bindings.restrict_to(variables).map(
            |(variable, value)| {
                Term::strict_equality(
                    Term::Variable(variable.clone()),
                    Term::Constant(value.clone()),
                )
            },
        ));
        let Some(condition) = condition else {
            return Ok(result);
        };
        if result.tree().is_empty_node() {
            return Ok(result);
        }

        let (tree, nullable) = result.into_parts();
        TranslationResult::try_new(IqTree::filter(condition, tree)?, nullable)
    }

    /// Converts a [TermPattern] into a term of a data atom.
    pub(crate) fn term_pattern(
        &self,
        pattern: &TermPattern,
        blank_node_mode: BlankNodeMode,
    ) -> SparqlResult<Term> {
        Ok(match pattern {
            TermPattern::NamedNode(node) => Term::Constant(Constant::Iri(node.clone())),
            TermPattern::BlankNode(node) => match blank_node_mode {
                BlankNodeMode::Variable => Term::Variable(self.blank_node_variable(node)),
                BlankNodeMode::Constant => Term::Constant(Constant::BlankNode(node.clone())),
            },
            TermPattern::Literal(literal) => Term::Constant(self.literal(literal)?),
            TermPattern::Variable(variable) => Term::Variable(variable.clone()),
        })
    }

    /// Returns the variable that stands for the blank node with the label of `node`.
    fn blank_node_variable(&self, node: &BlankNode) -> Variable {
        if let Some(variable) = self.blank_node_variables.borrow().get(node.as_str()) {
            return variable.clone();
        }
        let variable = self.generate_variable_from("b");
        self.blank_node_variables
            .borrow_mut()
            .insert(node.as_str().to_owned(), variable.clone());
        variable
    }

    pub(super) fn literal(&self, literal: &Literal) -> SparqlResult<Constant> {
        if self.options.validate_literals {
            validate_literal(literal)
                .map_err(|error| TranslationError::InvalidQuery(error.to_string()))?;
        }
        Ok(Constant::Literal(literal.clone()))
    }

    pub(super) fn ground_term(&self, term: &GroundTerm) -> SparqlResult<Constant> {
        match term {
            GroundTerm::Literal(literal) => self.literal(literal),
            GroundTerm::NamedNode(node) => Ok(Constant::Iri(node.clone())),
        }
    }
}

pub(crate) fn named_node_pattern(pattern: &NamedNodePattern) -> Term {
    match pattern {
        NamedNodePattern::NamedNode(node) => Term::Constant(Constant::Iri(node.clone())),
        NamedNodePattern::Variable(variable) => Term::Variable(variable.clone()),
    }
}
