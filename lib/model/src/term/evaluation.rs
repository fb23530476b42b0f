use crate::{Constant, FunctionSymbol, FunctionalTerm, Term};
use std::cmp::Ordering;

impl Term {
    /// Simplifies the term by folding function symbols whose arguments are known.
    ///
    /// The result is equivalent to the input under SPARQL's three-valued logic, where NULL stands
    /// for both an unbound variable and an evaluation error. Sub-terms that cannot be decided are
    /// kept as they are.
    pub fn simplify(&self) -> Term {
        match self {
            Term::Variable(_) | Term::Constant(_) => self.clone(),
            Term::Function(inner) => {
                let arguments = inner.arguments().iter().map(Term::simplify).collect();
                fold(inner.symbol(), arguments)
            }
        }
    }

    /// Returns the boolean value if the term is an `xsd:boolean` constant.
    pub fn as_boolean(&self) -> Option<bool> {
        self.as_constant().and_then(Constant::as_boolean)
    }
}

fn fold(symbol: &FunctionSymbol, mut arguments: Vec<Term>) -> Term {
    if !symbol.arity().accepts(arguments.len()) {
        return rebuild(symbol, arguments);
    }
    if symbol.is_strict() && arguments.iter().any(Term::is_null) {
        return Term::null();
    }

    match symbol {
        FunctionSymbol::And => fold_connective(symbol, arguments, false),
        FunctionSymbol::Or => fold_connective(symbol, arguments, true),
        FunctionSymbol::Not => match arguments[0].as_boolean() {
            Some(value) => Term::boolean(!value),
            None => rebuild(symbol, arguments),
        },
        FunctionSymbol::IsNull => match &arguments[0] {
            Term::Constant(constant) => Term::boolean(constant.is_null()),
            _ => rebuild(symbol, arguments),
        },
        FunctionSymbol::Bound => match &arguments[0] {
            Term::Constant(constant) => Term::boolean(!constant.is_null()),
            _ => rebuild(symbol, arguments),
        },
        FunctionSymbol::Coalesce => {
            arguments.retain(|argument| !argument.is_null());
            let first_is_constant = matches!(arguments.first(), Some(Term::Constant(_)));
            if arguments.is_empty() {
                Term::null()
            } else if first_is_constant || arguments.len() == 1 {
                arguments.swap_remove(0)
            } else {
                rebuild(symbol, arguments)
            }
        }
        FunctionSymbol::If => {
            let condition = arguments[0].as_boolean();
            if arguments[0].is_null() {
                Term::null()
            } else {
                match condition {
                    Some(true) => arguments.swap_remove(1),
                    Some(false) => arguments.swap_remove(2),
                    None => rebuild(symbol, arguments),
                }
            }
        }
        FunctionSymbol::EffectiveBooleanValue => match arguments[0].as_constant() {
            Some(constant) => match constant.effective_boolean_value() {
                Some(value) => Term::boolean(value),
                None => Term::null(),
            },
            None => rebuild(symbol, arguments),
        },
        FunctionSymbol::StrictEquality | FunctionSymbol::SameTerm => {
            match (arguments[0].as_constant(), arguments[1].as_constant()) {
                (Some(lhs), Some(rhs)) => Term::boolean(lhs == rhs),
                _ => rebuild(symbol, arguments),
            }
        }
        FunctionSymbol::Equal => fold_comparison(symbol, arguments, Ordering::is_eq),
        FunctionSymbol::LessThan => fold_comparison(symbol, arguments, Ordering::is_lt),
        FunctionSymbol::GreaterThan => fold_comparison(symbol, arguments, Ordering::is_gt),
        _ => rebuild(symbol, arguments),
    }
}

/// Folds `AND` (`absorbing = false`) or `OR` (`absorbing = true`).
///
/// A definite absorbing operand decides the result. Neutral operands are dropped. A NULL operand
/// is kept as it may still turn the result into NULL.
fn fold_connective(symbol: &FunctionSymbol, arguments: Vec<Term>, absorbing: bool) -> Term {
    let mut remaining = Vec::with_capacity(arguments.len());
    let mut has_null = false;
    for argument in arguments {
        match argument.as_boolean() {
            Some(value) if value == absorbing => return Term::boolean(absorbing),
            Some(_) => {}
            None if argument.is_null() => has_null = true,
            None => remaining.push(argument),
        }
    }

    if has_null {
        if remaining.is_empty() {
            return Term::null();
        }
        remaining.push(Term::null());
    }

    match remaining.len() {
        0 => Term::boolean(!absorbing),
        1 => remaining.swap_remove(0),
        _ => rebuild(symbol, remaining),
    }
}

/// Folds a SPARQL comparison of two constants if their order is known.
///
/// Numeric literals are compared by value, where a comparison with NaN is always false. Numeric
/// literals without a representable value are not folded. Strings are compared by their lexical
/// form. `=` additionally holds for identical terms.
fn fold_comparison(
    symbol: &FunctionSymbol,
    arguments: Vec<Term>,
    accepts: fn(Ordering) -> bool,
) -> Term {
    let (Some(lhs), Some(rhs)) = (arguments[0].as_constant(), arguments[1].as_constant()) else {
        return rebuild(symbol, arguments);
    };

    if let (Some(lhs), Some(rhs)) = (lhs.as_numeric(), rhs.as_numeric()) {
        return match lhs.compare(&rhs) {
            Some(ordering) => Term::boolean(accepts(ordering)),
            None => Term::boolean(false),
        };
    }

    if let (Some(lhs), Some(rhs)) = (lhs.as_string(), rhs.as_string()) {
        return Term::boolean(accepts(lhs.cmp(rhs)));
    }

    if *symbol == FunctionSymbol::Equal && lhs == rhs {
        return Term::boolean(true);
    }

    rebuild(symbol, arguments)
}

fn rebuild(symbol: &FunctionSymbol, arguments: Vec<Term>) -> Term {
    Term::Function(FunctionalTerm::new_unchecked(symbol.clone(), arguments))
}
