use crate::sparql::error::{SparqlResult, TranslationError};
use crate::sparql::rewriting::GraphPatternRewriter;
use sparql_iq_model::{
    is_xsd_datatype, AggregateFunction, AggregateKind, BuiltinFunction, Constant, FunctionSymbol,
    Term, Variable,
};
use spargebra::algebra::{
    AggregateExpression, AggregateFunction as SparqlAggregateFunction, Expression, Function,
};
use std::collections::BTreeSet;

/// Rewrites SPARQL expressions into [Term]s in the scope of a set of known variables.
///
/// A variable that is not known at the position of the expression cannot be bound. It is replaced
/// by its external value or by NULL.
pub(super) struct ExpressionRewriter<'rewriter, 'translation> {
    graph_rewriter: &'rewriter GraphPatternRewriter<'translation>,
    known_variables: &'rewriter BTreeSet<Variable>,
}

impl<'rewriter, 'translation> ExpressionRewriter<'rewriter, 'translation> {
    pub fn new(
        graph_rewriter: &'rewriter GraphPatternRewriter<'translation>,
        known_variables: &'rewriter BTreeSet<Variable>,
    ) -> Self {
        Self {
            graph_rewriter,
            known_variables,
        }
    }

    /// Rewrites an [Expression].
    pub fn rewrite(&self, expression: &Expression) -> SparqlResult<Term> {
        match expression {
            Expression::NamedNode(node) => Ok(Term::Constant(Constant::Iri(node.clone()))),
            Expression::Literal(literal) => {
                Ok(Term::Constant(self.graph_rewriter.literal(literal)?))
            }
            Expression::Variable(variable) => Ok(self.rewrite_variable(variable)),
            Expression::Or(lhs, rhs) => self.logical_expression(FunctionSymbol::Or, lhs, rhs),
            Expression::And(lhs, rhs) => self.logical_expression(FunctionSymbol::And, lhs, rhs),
            Expression::Equal(lhs, rhs) => self.binary(FunctionSymbol::Equal, lhs, rhs),
            Expression::SameTerm(lhs, rhs) => self.binary(FunctionSymbol::SameTerm, lhs, rhs),
            Expression::Greater(lhs, rhs) => self.binary(FunctionSymbol::GreaterThan, lhs, rhs),
            Expression::GreaterOrEqual(lhs, rhs) => {
                Ok(Term::not(self.binary(FunctionSymbol::LessThan, lhs, rhs)?))
            }
            Expression::Less(lhs, rhs) => self.binary(FunctionSymbol::LessThan, lhs, rhs),
            Expression::LessOrEqual(lhs, rhs) => {
                Ok(Term::not(self.binary(FunctionSymbol::GreaterThan, lhs, rhs)?))
            }
            Expression::In(lhs, rhs) => self.rewrite_in(lhs, rhs),
            Expression::Add(lhs, rhs) => self.binary(FunctionSymbol::Add, lhs, rhs),
            Expression::Subtract(lhs, rhs) => self.binary(FunctionSymbol::Subtract, lhs, rhs),
            Expression::Multiply(lhs, rhs) => self.binary(FunctionSymbol::Multiply, lhs, rhs),
            Expression::Divide(lhs, rhs) => self.binary(FunctionSymbol::Divide, lhs, rhs),
            Expression::UnaryPlus(inner) => {
                functional_term(FunctionSymbol::UnaryPlus, vec![self.rewrite(inner)?])
            }
            Expression::UnaryMinus(inner) => {
                functional_term(FunctionSymbol::UnaryMinus, vec![self.rewrite(inner)?])
            }
            Expression::Not(inner) => Ok(Term::not(self.rewrite_boolean(inner)?)),
            Expression::Exists(_) => TranslationError::unsupported("EXISTS"),
            Expression::Bound(variable) => self.rewrite_bound(variable),
            Expression::If(test, if_true, if_false) => functional_term(
                FunctionSymbol::If,
                vec![
                    self.rewrite_boolean(test)?,
                    self.rewrite(if_true)?,
                    self.rewrite(if_false)?,
                ],
            ),
            Expression::Coalesce(args) => {
                if args.is_empty() {
                    return Ok(Term::null());
                }
                let args = self.rewrite_all(args)?;
                functional_term(FunctionSymbol::Coalesce, args)
            }
            Expression::FunctionCall(function, args) => self.rewrite_function_call(function, args),
        }
    }

    /// Rewrites an [Expression] that is used as a condition. Terms that are not boolean are
    /// wrapped in their effective boolean value.
    pub fn rewrite_boolean(&self, expression: &Expression) -> SparqlResult<Term> {
        let term = self.rewrite(expression)?;
        if term.is_boolean_typed() {
            Ok(term)
        } else {
            functional_term(FunctionSymbol::EffectiveBooleanValue, vec![term])
        }
    }

    /// Rewrites an [AggregateExpression].
    pub fn rewrite_aggregate(&self, expression: &AggregateExpression) -> SparqlResult<Term> {
        match expression {
            AggregateExpression::CountSolutions { distinct } => {
                let symbol = AggregateFunction::new(AggregateKind::Count, *distinct);
                functional_term(FunctionSymbol::Aggregate(symbol), Vec::new())
            }
            AggregateExpression::FunctionCall {
                name,
                expr,
                distinct,
            } => {
                let kind = match name {
                    SparqlAggregateFunction::Count => AggregateKind::Count,
                    SparqlAggregateFunction::Sum => AggregateKind::Sum,
                    SparqlAggregateFunction::Avg => AggregateKind::Avg,
                    SparqlAggregateFunction::Min => AggregateKind::Min,
                    SparqlAggregateFunction::Max => AggregateKind::Max,
                    SparqlAggregateFunction::Sample => AggregateKind::Sample,
                    SparqlAggregateFunction::GroupConcat { separator } => {
                        AggregateKind::GroupConcat {
                            separator: separator.clone().unwrap_or_else(|| {
                                self.graph_rewriter
                                    .options
                                    .default_group_concat_separator
                                    .clone()
                            }),
                        }
                    }
                    SparqlAggregateFunction::Custom(name) => {
                        return TranslationError::unsupported(format!(
                            "Custom aggregate function {name}"
                        ))
                    }
                };
                // DISTINCT does not change the result of these aggregates.
                let distinct = *distinct
                    && !matches!(
                        kind,
                        AggregateKind::Min | AggregateKind::Max | AggregateKind::Sample
                    );
                let symbol = AggregateFunction::new(kind, distinct);
                functional_term(FunctionSymbol::Aggregate(symbol), vec![self.rewrite(expr)?])
            }
        }
    }

    fn rewrite_variable(&self, variable: &Variable) -> Term {
        if self.known_variables.contains(variable) {
            Term::Variable(variable.clone())
        } else {
            self.graph_rewriter.external_value_or_null(variable)
        }
    }

    /// `BOUND` of a variable that is not in scope is always false.
    fn rewrite_bound(&self, variable: &Variable) -> SparqlResult<Term> {
        if self.known_variables.contains(variable) {
            functional_term(FunctionSymbol::Bound, vec![Term::Variable(variable.clone())])
        } else {
            Ok(Term::boolean(false))
        }
    }

    /// Rewrites `lhs IN (rhs...)` into a disjunction of equalities.
    fn rewrite_in(&self, lhs: &Expression, rhs: &[Expression]) -> SparqlResult<Term> {
        let lhs = self.rewrite(lhs)?;
        let equalities = rhs
            .iter()
            .map(|candidate| {
                functional_term(
                    FunctionSymbol::Equal,
                    vec![lhs.clone(), self.rewrite(candidate)?],
                )
            })
            .collect::<SparqlResult<Vec<_>>>()?;
        Ok(Term::disjunction(equalities).unwrap_or_else(|| Term::boolean(false)))
    }

    /// Rewrites a SPARQL function call.
    fn rewrite_function_call(&self, function: &Function, args: &[Expression]) -> SparqlResult<Term> {
        match function {
            Function::Lang => {
                let arg = unary_args(args)?;
                if !matches!(
                    arg,
                    Expression::Variable(_) | Expression::Literal(_) | Expression::NamedNode(_)
                ) {
                    return TranslationError::unsupported(format!(
                        "LANG is only supported on variables and constants, found {arg}"
                    ));
                }
                functional_term(
                    FunctionSymbol::Builtin(BuiltinFunction::Lang),
                    vec![self.rewrite(arg)?],
                )
            }
            Function::LangMatches => self.rewrite_lang_matches(args),
            Function::Iri => {
                let base = self.graph_rewriter.base_iri.map(|iri| iri.as_str().to_owned());
                let args = self.rewrite_all(args)?;
                functional_term(FunctionSymbol::Iri { base }, args)
            }
            Function::BNode => {
                let args = self.rewrite_all(args)?;
                functional_term(FunctionSymbol::BNode, args)
            }
            Function::Custom(name) => {
                if !is_xsd_datatype(name) {
                    return TranslationError::unsupported(format!("Custom function {name}"));
                }
                let args = self.rewrite_all(args)?;
                functional_term(FunctionSymbol::Cast(name.clone()), args)
            }
            _ => {
                let Some(builtin) = builtin_function(function) else {
                    return TranslationError::unsupported(format!("The function {function}"));
                };
                let args = self.rewrite_all(args)?;
                functional_term(FunctionSymbol::Builtin(builtin), args)
            }
        }
    }

    /// `langMatches` is only supported in the shape `langMatches(LANG(x), "range")`.
    fn rewrite_lang_matches(&self, args: &[Expression]) -> SparqlResult<Term> {
        let (tag, range) = binary_args(args)?;
        let tag = self.rewrite(tag)?;
        let is_lang = tag.as_functional_term().is_some_and(|term| {
            *term.symbol() == FunctionSymbol::Builtin(BuiltinFunction::Lang)
        });
        if !is_lang {
            return TranslationError::unsupported(format!(
                "The first argument of langMatches must be a LANG call, found {tag}"
            ));
        }

        let range = self.rewrite(range)?;
        // NULL stems from an unbound variable and is not a language range.
        if range.as_constant().map_or(true, Constant::is_null) {
            return TranslationError::unsupported(format!(
                "The second argument of langMatches must be a constant, found {range}"
            ));
        }
        functional_term(
            FunctionSymbol::Builtin(BuiltinFunction::LangMatches),
            vec![tag, range],
        )
    }

    fn rewrite_all(&self, args: &[Expression]) -> SparqlResult<Vec<Term>> {
        args.iter().map(|arg| self.rewrite(arg)).collect()
    }

    fn binary(
        &self,
        symbol: FunctionSymbol,
        lhs: &Expression,
        rhs: &Expression,
    ) -> SparqlResult<Term> {
        functional_term(symbol, vec![self.rewrite(lhs)?, self.rewrite(rhs)?])
    }

    fn logical_expression(
        &self,
        symbol: FunctionSymbol,
        lhs: &Expression,
        rhs: &Expression,
    ) -> SparqlResult<Term> {
        functional_term(
            symbol,
            vec![self.rewrite_boolean(lhs)?, self.rewrite_boolean(rhs)?],
        )
    }
}

/// Builds a functional term. A wrong number of arguments cannot stem from a valid query.
fn functional_term(symbol: FunctionSymbol, args: Vec<Term>) -> SparqlResult<Term> {
    Term::function(symbol, args).map_err(|error| TranslationError::InvalidQuery(error.to_string()))
}

fn unary_args(args: &[Expression]) -> SparqlResult<&Expression> {
    match args {
        [arg] => Ok(arg),
        _ => TranslationError::invalid(format!(
            "Expected a single argument, found {}",
            args.len()
        )),
    }
}

fn binary_args(args: &[Expression]) -> SparqlResult<(&Expression, &Expression)> {
    match args {
        [lhs, rhs] => Ok((lhs, rhs)),
        _ => TranslationError::invalid(format!("Expected two arguments, found {}", args.len())),
    }
}

/// Maps the SPARQL built-in functions that have a direct counterpart.
fn builtin_function(function: &Function) -> Option<BuiltinFunction> {
    Some(match function {
        Function::Str => BuiltinFunction::Str,
        Function::Lang => BuiltinFunction::Lang,
        Function::LangMatches => BuiltinFunction::LangMatches,
        Function::Datatype => BuiltinFunction::Datatype,
        Function::Rand => BuiltinFunction::Rand,
        Function::Abs => BuiltinFunction::Abs,
        Function::Ceil => BuiltinFunction::Ceil,
        Function::Floor => BuiltinFunction::Floor,
        Function::Round => BuiltinFunction::Round,
        Function::Concat => BuiltinFunction::Concat,
        Function::SubStr => BuiltinFunction::SubStr,
        Function::StrLen => BuiltinFunction::StrLen,
        Function::Replace => BuiltinFunction::Replace,
        Function::UCase => BuiltinFunction::UCase,
        Function::LCase => BuiltinFunction::LCase,
        Function::EncodeForUri => BuiltinFunction::EncodeForUri,
        Function::Contains => BuiltinFunction::Contains,
        Function::StrStarts => BuiltinFunction::StrStarts,
        Function::StrEnds => BuiltinFunction::StrEnds,
        Function::StrBefore => BuiltinFunction::StrBefore,
        Function::StrAfter => BuiltinFunction::StrAfter,
        Function::Year => BuiltinFunction::Year,
        Function::Month => BuiltinFunction::Month,
        Function::Day => BuiltinFunction::Day,
        Function::Hours => BuiltinFunction::Hours,
        Function::Minutes => BuiltinFunction::Minutes,
        Function::Seconds => BuiltinFunction::Seconds,
        Function::Timezone => BuiltinFunction::Timezone,
        Function::Tz => BuiltinFunction::Tz,
        Function::Now => BuiltinFunction::Now,
        Function::Uuid => BuiltinFunction::Uuid,
        Function::StrUuid => BuiltinFunction::StrUuid,
        Function::Md5 => BuiltinFunction::Md5,
        Function::Sha1 => BuiltinFunction::Sha1,
        Function::Sha256 => BuiltinFunction::Sha256,
        Function::Sha384 => BuiltinFunction::Sha384,
        Function::Sha512 => BuiltinFunction::Sha512,
        Function::StrLang => BuiltinFunction::StrLang,
        Function::StrDt => BuiltinFunction::StrDt,
        Function::IsIri => BuiltinFunction::IsIri,
        Function::IsBlank => BuiltinFunction::IsBlank,
        Function::IsLiteral => BuiltinFunction::IsLiteral,
        Function::IsNumeric => BuiltinFunction::IsNumeric,
        Function::Regex => BuiltinFunction::Regex,
        _ => return None,
    })
}
