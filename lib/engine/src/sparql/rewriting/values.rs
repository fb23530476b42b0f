use crate::sparql::error::SparqlResult;
use crate::sparql::rewriting::{GraphPatternRewriter, TranslationResult};
use sparql_iq_logical::IqTree;
use sparql_iq_model::{GroundTerm, Substitution, Term, Variable};
use std::collections::BTreeSet;

impl GraphPatternRewriter<'_> {
    /// Translates an inline data block (`VALUES`).
    ///
    /// Each row becomes a construction node over [IqTree::True] and the rows are combined with a
    /// union. `UNDEF` is represented by NULL.
    pub(super) fn rewrite_values(
        &self,
        variables: &[Variable],
        bindings: &[Vec<Option<GroundTerm>>],
    ) -> SparqlResult<TranslationResult> {
        let all_variables = variables.iter().cloned().collect::<BTreeSet<_>>();
        let nullable = variables
            .iter()
            .enumerate()
            .filter(|(index, _)| {
                bindings
                    .iter()
                    .any(|row| row.get(*index).map_or(true, Option::is_none))
            })
            .map(|(_, variable)| variable.clone())
            .collect();

        let mut rows = bindings
            .iter()
            .map(|row| self.values_row(variables, &all_variables, row))
            .collect::<SparqlResult<Vec<_>>>()?;
        let tree = match rows.len() {
            0 => IqTree::empty(all_variables.clone()),
            1 => rows.swap_remove(0),
            _ => IqTree::union(all_variables.clone(), rows)?,
        };

        let result = TranslationResult::try_new(tree, nullable)?;
        self.with_external_binding_filter(result, &all_variables)
    }

    fn values_row(
        &self,
        variables: &[Variable],
        all_variables: &BTreeSet<Variable>,
        row: &[Option<GroundTerm>],
    ) -> SparqlResult<IqTree> {
        let substitution = variables
            .iter()
            .enumerate()
            .map(|(index, variable)| -> SparqlResult<(Variable, Term)> {
                let value = match row.get(index).and_then(Option::as_ref) {
                    Some(value) => Term::Constant(self.ground_term(value)?),
                    None => Term::null(),
                };
                Ok((variable.clone(), value))
            })
            .collect::<SparqlResult<Substitution>>()?;
        Ok(IqTree::construction(
            all_variables.clone(),
            substitution,
            IqTree::True,
        )?)
    }
}
