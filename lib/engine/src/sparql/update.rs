use crate::sparql::error::{SparqlResult, TranslationError};
use crate::sparql::rewriting::{
    collect_term_pattern_variables, named_node_pattern, GraphPatternRewriter,
};
use crate::sparql::translator::QueryTranslator;
use itertools::Itertools;
use sparql_iq_common::{BlankNodeMode, ExternalBindings};
use sparql_iq_logical::{AtomPredicate, DataAtom, Iq, IqTree, ProjectionAtom};
use sparql_iq_model::{
    Constant, FunctionSymbol, GraphNamePattern, Literal, NamedNodePattern, QuadPattern, Substitution, Term,
    TermPattern, Variable,
};
use spargebra::{GraphUpdateOperation, Update};
use std::collections::{BTreeMap, BTreeSet};

impl QueryTranslator {
    /// Translates an `INSERT ... WHERE` update into one [Iq] per distinct template atom.
    ///
    /// Each IQ produces the arguments of its atom for every solution of the `WHERE` clause. An
    /// empty list is returned if the `WHERE` clause cannot have any solution.
    pub fn translate_insert(&self, update: &Update) -> SparqlResult<Vec<Iq>> {
        tracing::debug!(%update, "Translating SPARQL update");
        let [operation] = update.operations.as_slice() else {
            return TranslationError::invalid(format!(
                "Expected a single update operation, found {}",
                update.operations.len()
            ));
        };
        let GraphUpdateOperation::DeleteInsert {
            delete,
            insert,
            using,
            pattern,
        } = operation
        else {
            return TranslationError::unsupported(format!(
                "The update operation {}",
                operation_name(operation)
            ));
        };
        if !delete.is_empty() {
            return TranslationError::invalid("DELETE templates are not supported by INSERT");
        }
        if insert.is_empty() {
            return TranslationError::invalid("The INSERT template is empty");
        }

        // Blank nodes of the WHERE clause are always plain variables.
        let translator = self.with_blank_node_mode(BlankNodeMode::Variable);
        let bindings = ExternalBindings::empty();
        let template_variables = insert.iter().flat_map(quad_variables).collect::<Vec<_>>();
        let rewriter = translator.create_rewriter(
            pattern,
            &template_variables,
            using.as_ref(),
            update.base_iri.as_ref(),
            &bindings,
        );

        let where_tree = rewriter.rewrite(pattern)?.into_tree();
        if where_tree.is_empty_node() {
            tracing::debug!("The WHERE clause has no solutions");
            return Ok(Vec::new());
        }

        let mut template = InsertTemplate::new(&rewriter);
        let atoms = insert
            .iter()
            .map(|quad| template.data_atom(quad))
            .collect::<SparqlResult<Vec<_>>>()?
            .into_iter()
            .unique()
            .collect::<Vec<_>>();
        let where_tree = template.bind_blank_nodes(where_tree)?;

        let iqs = atoms
            .iter()
            .map(|atom| insert_iq(&rewriter, atom, &where_tree))
            .collect::<SparqlResult<Vec<_>>>()?;
        for iq in &iqs {
            tracing::debug!(%iq, "Translated INSERT template atom");
        }
        Ok(iqs)
    }
}

/// The data atoms of an `INSERT` template.
///
/// Every blank node label of the template stands for a fresh blank node per solution and is
/// replaced by a variable.
struct InsertTemplate<'rewriter, 'translation> {
    rewriter: &'rewriter GraphPatternRewriter<'translation>,
    blank_nodes: BTreeMap<String, Variable>,
}

impl<'rewriter, 'translation> InsertTemplate<'rewriter, 'translation> {
    fn new(rewriter: &'rewriter GraphPatternRewriter<'translation>) -> Self {
        Self {
            rewriter,
            blank_nodes: BTreeMap::new(),
        }
    }

    fn data_atom(&mut self, quad: &QuadPattern) -> SparqlResult<DataAtom> {
        let subject = self.term(&quad.subject)?;
        let predicate = named_node_pattern(&quad.predicate);
        let object = self.term(&quad.object)?;
        let atom = match &quad.graph_name {
            GraphNamePattern::DefaultGraph => {
                DataAtom::try_new(AtomPredicate::Triple, vec![subject, predicate, object])?
            }
            GraphNamePattern::NamedNode(graph) => DataAtom::try_new(
                AtomPredicate::Quad,
                vec![
                    subject,
                    predicate,
                    object,
                    Term::Constant(Constant::Iri(graph.clone())),
                ],
            )?,
            GraphNamePattern::Variable(graph) => DataAtom::try_new(
                AtomPredicate::Quad,
                vec![subject, predicate, object, Term::Variable(graph.clone())],
            )?,
        };
        Ok(atom)
    }

    fn term(&mut self, pattern: &TermPattern) -> SparqlResult<Term> {
        let TermPattern::BlankNode(node) = pattern else {
            return self.rewriter.term_pattern(pattern, BlankNodeMode::Constant);
        };
        let variable = self
            .blank_nodes
            .entry(node.as_str().to_owned())
            .or_insert_with(|| self.rewriter.generate_variable_from("b"));
        Ok(Term::Variable(variable.clone()))
    }

    /// Binds the blank node variables of the template on top of the `WHERE` tree.
    ///
    /// The blank node of a label depends on the label and on the solution of the `WHERE` clause.
    fn bind_blank_nodes(&self, where_tree: IqTree) -> SparqlResult<IqTree> {
        if self.blank_nodes.is_empty() {
            return Ok(where_tree);
        }

        let solution = where_tree
            .projected_variables()
            .into_iter()
            .map(Term::Variable)
            .collect::<Vec<_>>();
        let substitution = self
            .blank_nodes
            .iter()
            .map(|(label, variable)| -> SparqlResult<(Variable, Term)> {
                let label = Term::Constant(Constant::Literal(Literal::new_simple_literal(label)));
                let arguments = std::iter::once(label)
                    .chain(solution.iter().cloned())
                    .collect();
                let term = Term::function(FunctionSymbol::BNodeTemplate, arguments)?;
                Ok((variable.clone(), term))
            })
            .collect::<SparqlResult<Substitution>>()?;

        let projected = where_tree
            .projected_variables()
            .into_iter()
            .chain(substitution.domain())
            .collect();
        Ok(IqTree::construction(projected, substitution, where_tree)?)
    }
}

/// Creates the IQ that produces the arguments of `atom` from the solutions of `where_tree`.
///
/// The answer atom must consist of distinct variables. Constants and repeated variables are
/// therefore bound to fresh variables. Template variables that the `WHERE` clause does not bind
/// are NULL.
fn insert_iq(
    rewriter: &GraphPatternRewriter<'_>,
    atom: &DataAtom,
    where_tree: &IqTree,
) -> SparqlResult<Iq> {
    let where_variables = where_tree.projected_variables();
    let mut head = Vec::with_capacity(atom.arguments().len());
    let mut substitution = Vec::new();
    for argument in atom.arguments() {
        match argument {
            Term::Variable(variable) if !head.contains(variable) => {
                if !where_variables.contains(variable) {
                    substitution.push((variable.clone(), Term::null()));
                }
                head.push(variable.clone());
            }
            Term::Variable(variable) => {
                let fresh = rewriter.generate_variable_from(variable.as_str());
                let value = if where_variables.contains(variable) {
                    Term::Variable(variable.clone())
                } else {
                    Term::null()
                };
                substitution.push((fresh.clone(), value));
                head.push(fresh);
            }
            Term::Constant(_) => {
                let fresh = rewriter.generate_variable();
                substitution.push((fresh.clone(), argument.clone()));
                head.push(fresh);
            }
            Term::Function(_) => {
                return TranslationError::internal(format!(
                    "The data atom {atom} contains a functional term"
                ))
            }
        }
    }

    let projected = head.iter().cloned().collect::<BTreeSet<_>>();
    let substitution = substitution.into_iter().collect::<Substitution>();
    let tree = IqTree::construction(projected, substitution, where_tree.clone())?;
    let projection_atom = ProjectionAtom::try_new(atom.predicate(), head)?;
    Ok(Iq::try_new(projection_atom, tree)?)
}

fn quad_variables(quad: &QuadPattern) -> BTreeSet<Variable> {
    let mut variables = BTreeSet::new();
    collect_term_pattern_variables(&quad.subject, &mut variables);
    collect_term_pattern_variables(&quad.object, &mut variables);
    if let NamedNodePattern::Variable(variable) = &quad.predicate {
        variables.insert(variable.clone());
    }
    if let GraphNamePattern::Variable(variable) = &quad.graph_name {
        variables.insert(variable.clone());
    }
    variables
}

fn operation_name(operation: &GraphUpdateOperation) -> &'static str {
    match operation {
        GraphUpdateOperation::InsertData { .. } => "INSERT DATA",
        GraphUpdateOperation::DeleteData { .. } => "DELETE DATA",
        GraphUpdateOperation::DeleteInsert { .. } => "DELETE/INSERT",
        GraphUpdateOperation::Load { .. } => "LOAD",
        GraphUpdateOperation::Clear { .. } => "CLEAR",
        GraphUpdateOperation::Create { .. } => "CREATE",
        GraphUpdateOperation::Drop { .. } => "DROP",
    }
}
