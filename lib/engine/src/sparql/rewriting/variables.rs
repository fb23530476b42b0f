use sparql_iq_model::{NamedNodePattern, TermPattern, TriplePattern, Variable};
use spargebra::algebra::{AggregateExpression, Expression, GraphPattern, OrderExpression};
use std::collections::BTreeSet;

/// Collects every variable that occurs anywhere in `pattern`, including variables that are
/// projected away by sub-queries.
pub(crate) fn collect_pattern_variables(pattern: &GraphPattern, result: &mut BTreeSet<Variable>) {
    match pattern {
        GraphPattern::Bgp { patterns } => {
            for pattern in patterns {
                collect_triple_pattern_variables(pattern, result);
            }
        }
        GraphPattern::Path {
            subject, object, ..
        } => {
            collect_term_pattern_variables(subject, result);
            collect_term_pattern_variables(object, result);
        }
        GraphPattern::Join { left, right }
        | GraphPattern::Union { left, right }
        | GraphPattern::Minus { left, right } => {
            collect_pattern_variables(left, result);
            collect_pattern_variables(right, result);
        }
        GraphPattern::LeftJoin {
            left,
            right,
            expression,
        } => {
            collect_pattern_variables(left, result);
            collect_pattern_variables(right, result);
            if let Some(expression) = expression {
                collect_expression_variables(expression, result);
            }
        }
        GraphPattern::Filter { expr, inner } => {
            collect_expression_variables(expr, result);
            collect_pattern_variables(inner, result);
        }
        GraphPattern::Graph { name, inner } => {
            if let NamedNodePattern::Variable(variable) = name {
                result.insert(variable.clone());
            }
            collect_pattern_variables(inner, result);
        }
        GraphPattern::Extend {
            inner,
            variable,
            expression,
        } => {
            result.insert(variable.clone());
            collect_expression_variables(expression, result);
            collect_pattern_variables(inner, result);
        }
        GraphPattern::Values { variables, .. } => result.extend(variables.iter().cloned()),
        GraphPattern::OrderBy { inner, expression } => {
            for expression in expression {
                let (OrderExpression::Asc(expression) | OrderExpression::Desc(expression)) =
                    expression;
                collect_expression_variables(expression, result);
            }
            collect_pattern_variables(inner, result);
        }
        GraphPattern::Project { inner, variables } => {
            result.extend(variables.iter().cloned());
            collect_pattern_variables(inner, result);
        }
        GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. }
        | GraphPattern::Service { inner, .. } => collect_pattern_variables(inner, result),
        GraphPattern::Group {
            inner,
            variables,
            aggregates,
        } => {
            result.extend(variables.iter().cloned());
            for (variable, aggregate) in aggregates {
                result.insert(variable.clone());
                if let AggregateExpression::FunctionCall { expr, .. } = aggregate {
                    collect_expression_variables(expr, result);
                }
            }
            collect_pattern_variables(inner, result);
        }
    }
}

fn collect_expression_variables(expression: &Expression, result: &mut BTreeSet<Variable>) {
    match expression {
        Expression::NamedNode(_) | Expression::Literal(_) => {}
        Expression::Variable(variable) | Expression::Bound(variable) => {
            result.insert(variable.clone());
        }
        Expression::Or(lhs, rhs)
        | Expression::And(lhs, rhs)
        | Expression::Equal(lhs, rhs)
        | Expression::SameTerm(lhs, rhs)
        | Expression::Greater(lhs, rhs)
        | Expression::GreaterOrEqual(lhs, rhs)
        | Expression::Less(lhs, rhs)
        | Expression::LessOrEqual(lhs, rhs)
        | Expression::Add(lhs, rhs)
        | Expression::Subtract(lhs, rhs)
        | Expression::Multiply(lhs, rhs)
        | Expression::Divide(lhs, rhs) => {
            collect_expression_variables(lhs, result);
            collect_expression_variables(rhs, result);
        }
        Expression::In(lhs, rhs) => {
            collect_expression_variables(lhs, result);
            for expression in rhs {
                collect_expression_variables(expression, result);
            }
        }
        Expression::UnaryPlus(inner) | Expression::UnaryMinus(inner) | Expression::Not(inner) => {
            collect_expression_variables(inner, result);
        }
        Expression::Exists(pattern) => collect_pattern_variables(pattern, result),
        Expression::If(test, if_true, if_false) => {
            collect_expression_variables(test, result);
            collect_expression_variables(if_true, result);
            collect_expression_variables(if_false, result);
        }
        Expression::Coalesce(args) | Expression::FunctionCall(_, args) => {
            for expression in args {
                collect_expression_variables(expression, result);
            }
        }
    }
}

fn collect_triple_pattern_variables(
    pattern: &TriplePattern,
    result: &mut BTreeSet<Variable>,
) {
    collect_term_pattern_variables(&pattern.subject, result);
    if let NamedNodePattern::Variable(variable) = &pattern.predicate {
        result.insert(variable.clone());
    }
    collect_term_pattern_variables(&pattern.object, result);
}

pub(crate) fn collect_term_pattern_variables(
    pattern: &TermPattern,
    result: &mut BTreeSet<Variable>,
) {
    if let TermPattern::Variable(variable) = pattern {
        result.insert(variable.clone());
    }
}
