use crate::literal::{is_integer_datatype, is_numeric_datatype};
use crate::{BlankNode, GroundTerm, Literal, NamedNode};
use oxrdf::vocab::xsd;
use oxsdatatypes::{Decimal, Double, Integer};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A ground value of the IQ algebra.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    Iri(NamedNode),
    Literal(Literal),
    BlankNode(BlankNode),
    /// Stands for an unbound SPARQL variable.
    Null,
}

impl Constant {
    /// Creates an `xsd:boolean` constant.
    pub fn boolean(value: bool) -> Self {
        Constant::Literal(Literal::from(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Constant::Null)
    }

    /// Returns the value of an `xsd:boolean` literal.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Constant::Literal(literal) if literal.datatype() == xsd::BOOLEAN => {
                match literal.value() {
                    "true" | "1" => Some(true),
                    "false" | "0" => Some(false),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Returns the value of a numeric literal as a double. Integers and decimals may lose
    /// precision, hence this must not be used for comparisons.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Constant::Literal(literal) if is_numeric_datatype(literal.datatype().as_str()) => {
                literal.value().parse::<Double>().ok().map(f64::from)
            }
            _ => None,
        }
    }

    /// Returns the value of a numeric literal for comparisons.
    ///
    /// Integers and decimals keep their exact value. [None] is returned if the lexical form is
    /// invalid or the exact value cannot be represented.
    pub fn as_numeric(&self) -> Option<NumericValue> {
        let Constant::Literal(literal) = self else {
            return None;
        };
        let datatype = literal.datatype();
        if !is_numeric_datatype(datatype.as_str()) {
            return None;
        }

        let approximate = literal.value().parse::<Double>().ok()?;
        let exact = if is_integer_datatype(datatype.as_str()) {
            Some(ExactNumeric::Integer(literal.value().parse::<Integer>().ok()?))
        } else if datatype == xsd::DECIMAL {
            Some(ExactNumeric::Decimal(literal.value().parse::<Decimal>().ok()?))
        } else {
            None
        };
        Some(NumericValue { exact, approximate })
    }

    /// Returns the value of a simple literal or an `xsd:string`.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Constant::Literal(literal) if literal.datatype() == xsd::STRING => {
                Some(literal.value())
            }
            _ => None,
        }
    }

    /// Computes the effective boolean value of this constant.
    ///
    /// # Relevant Resources
    /// - [SPARQL 1.1 - Effective Boolean Value](https://www.w3.org/TR/sparql11-query/#ebv)
    pub fn effective_boolean_value(&self) -> Option<bool> {
        if let Some(value) = self.as_boolean() {
            return Some(value);
        }
        if let Some(value) = self.as_double() {
            return Some(!(value == 0.0 || value.is_nan()));
        }
        match self {
            Constant::Literal(literal)
                if literal.datatype() == xsd::STRING || literal.language().is_some() =>
            {
                Some(!literal.value().is_empty())
            }
            _ => None,
        }
    }
}

/// The value of a numeric literal.
///
/// Values are compared after promotion to their common type. `xsd:integer` and `xsd:decimal` are
/// compared exactly, and only a comparison with an `xsd:float` or `xsd:double` uses doubles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericValue {
    exact: Option<ExactNumeric>,
    approximate: Double,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExactNumeric {
    Integer(Integer),
    Decimal(Decimal),
}

impl ExactNumeric {
    fn to_decimal(self) -> Decimal {
        match self {
            ExactNumeric::Integer(value) => Decimal::from(i64::from(value)),
            ExactNumeric::Decimal(value) => value,
        }
    }
}

impl NumericValue {
    /// Compares two values. [None] if one of them is NaN.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self.exact, other.exact) {
            (Some(ExactNumeric::Integer(lhs)), Some(ExactNumeric::Integer(rhs))) => {
                Some(lhs.cmp(&rhs))
            }
            (Some(lhs), Some(rhs)) => Some(lhs.to_decimal().cmp(&rhs.to_decimal())),
            _ => self.approximate.partial_cmp(&other.approximate),
        }
    }
}

impl From<NamedNode> for Constant {
    fn from(value: NamedNode) -> Self {
        Constant::Iri(value)
    }
}

impl From<Literal> for Constant {
    fn from(value: Literal) -> Self {
        Constant::Literal(value)
    }
}

impl From<BlankNode> for Constant {
    fn from(value: BlankNode) -> Self {
        Constant::BlankNode(value)
    }
}

impl From<GroundTerm> for Constant {
    fn from(value: GroundTerm) -> Self {
        match value {
            GroundTerm::NamedNode(nn) => Constant::Iri(nn),
            GroundTerm::Literal(literal) => Constant::Literal(literal),
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Iri(iri) => write!(f, "{iri}"),
            Constant::Literal(literal) => write!(f, "{literal}"),
            Constant::BlankNode(bnode) => write!(f, "{bnode}"),
            Constant::Null => f.write_str("NULL"),
        }
    }
}
