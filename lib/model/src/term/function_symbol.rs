use crate::NamedNode;
use std::fmt::{Display, Formatter};

/// The number of arguments that a [FunctionSymbol] accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    /// An inclusive range.
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Range(min, max) => write!(f, "{min} to {max}"),
            Arity::AtLeast(min) => write!(f, "at least {min}"),
        }
    }
}

/// The SPARQL built-in functions that have no special treatment in the algebra.
///
/// # Relevant Resources
/// - [SPARQL 1.1 - Function Definitions](https://www.w3.org/TR/sparql11-query/#SparqlOps)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Str,
    Lang,
    LangMatches,
    Datatype,
    Rand,
    Abs,
    Ceil,
    Floor,
    Round,
    Concat,
    SubStr,
    StrLen,
    Replace,
    UCase,
    LCase,
    EncodeForUri,
    Contains,
    StrStarts,
    StrEnds,
    StrBefore,
    StrAfter,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Timezone,
    Tz,
    Now,
    Uuid,
    StrUuid,
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    StrLang,
    StrDt,
    IsIri,
    IsBlank,
    IsLiteral,
    IsNumeric,
    Regex,
}

impl BuiltinFunction {
    pub fn arity(self) -> Arity {
        match self {
            BuiltinFunction::Rand
            | BuiltinFunction::Now
            | BuiltinFunction::Uuid
            | BuiltinFunction::StrUuid => Arity::Exact(0),
            BuiltinFunction::LangMatches
            | BuiltinFunction::Contains
            | BuiltinFunction::StrStarts
            | BuiltinFunction::StrEnds
            | BuiltinFunction::StrBefore
            | BuiltinFunction::StrAfter
            | BuiltinFunction::StrLang
            | BuiltinFunction::StrDt => Arity::Exact(2),
            BuiltinFunction::Concat => Arity::AtLeast(0),
            BuiltinFunction::SubStr | BuiltinFunction::Regex => Arity::Range(2, 3),
            BuiltinFunction::Replace => Arity::Range(3, 4),
            _ => Arity::Exact(1),
        }
    }

    fn returns_boolean(self) -> bool {
        matches!(
            self,
            BuiltinFunction::LangMatches
                | BuiltinFunction::Contains
                | BuiltinFunction::StrStarts
                | BuiltinFunction::StrEnds
                | BuiltinFunction::IsIri
                | BuiltinFunction::IsBlank
                | BuiltinFunction::IsLiteral
                | BuiltinFunction::IsNumeric
                | BuiltinFunction::Regex
        )
    }

    /// Functions that produce a value for any non-null input.
    fn is_total(self) -> bool {
        matches!(
            self,
            BuiltinFunction::Rand
                | BuiltinFunction::Now
                | BuiltinFunction::Uuid
                | BuiltinFunction::StrUuid
                | BuiltinFunction::IsIri
                | BuiltinFunction::IsBlank
                | BuiltinFunction::IsLiteral
                | BuiltinFunction::IsNumeric
        )
    }

    fn name(self) -> &'static str {
        match self {
            BuiltinFunction::Str => "STR",
            BuiltinFunction::Lang => "LANG",
            BuiltinFunction::LangMatches => "LANG_MATCHES",
            BuiltinFunction::Datatype => "DATATYPE",
            BuiltinFunction::Rand => "RAND",
            BuiltinFunction::Abs => "ABS",
            BuiltinFunction::Ceil => "CEIL",
            BuiltinFunction::Floor => "FLOOR",
            BuiltinFunction::Round => "ROUND",
            BuiltinFunction::Concat => "CONCAT",
            BuiltinFunction::SubStr => "SUBSTR",
            BuiltinFunction::StrLen => "STRLEN",
            BuiltinFunction::Replace => "REPLACE",
            BuiltinFunction::UCase => "UCASE",
            BuiltinFunction::LCase => "LCASE",
            BuiltinFunction::EncodeForUri => "ENCODE_FOR_URI",
            BuiltinFunction::Contains => "CONTAINS",
            BuiltinFunction::StrStarts => "STRSTARTS",
            BuiltinFunction::StrEnds => "STRENDS",
            BuiltinFunction::StrBefore => "STRBEFORE",
            BuiltinFunction::StrAfter => "STRAFTER",
            BuiltinFunction::Year => "YEAR",
            BuiltinFunction::Month => "MONTH",
            BuiltinFunction::Day => "DAY",
            BuiltinFunction::Hours => "HOURS",
            BuiltinFunction::Minutes => "MINUTES",
            BuiltinFunction::Seconds => "SECONDS",
            BuiltinFunction::Timezone => "TIMEZONE",
            BuiltinFunction::Tz => "TZ",
            BuiltinFunction::Now => "NOW",
            BuiltinFunction::Uuid => "UUID",
            BuiltinFunction::StrUuid => "STRUUID",
            BuiltinFunction::Md5 => "MD5",
            BuiltinFunction::Sha1 => "SHA1",
            BuiltinFunction::Sha256 => "SHA256",
            BuiltinFunction::Sha384 => "SHA384",
            BuiltinFunction::Sha512 => "SHA512",
            BuiltinFunction::StrLang => "STRLANG",
            BuiltinFunction::StrDt => "STRDT",
            BuiltinFunction::IsIri => "IS_IRI",
            BuiltinFunction::IsBlank => "IS_BLANK",
            BuiltinFunction::IsLiteral => "IS_LITERAL",
            BuiltinFunction::IsNumeric => "IS_NUMERIC",
            BuiltinFunction::Regex => "REGEX",
        }
    }
}

/// The aggregate functions of SPARQL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Sample,
    GroupConcat { separator: String },
}

/// An aggregate function together with its `DISTINCT` flag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AggregateFunction {
    pub kind: AggregateKind,
    pub distinct: bool,
}

impl AggregateFunction {
    pub fn new(kind: AggregateKind, distinct: bool) -> Self {
        Self { kind, distinct }
    }
}

/// A function symbol of the IQ algebra.
///
/// Each symbol has a fixed [Arity], knows whether it produces a boolean, and whether it may produce
/// NULL even if all of its arguments are non-null (e.g., because of a type error in SPARQL).
/// The evaluation rules of the symbols are implemented in [Term::simplify](crate::Term::simplify).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FunctionSymbol {
    And,
    Or,
    Not,
    /// The SPARQL `=` operator.
    Equal,
    SameTerm,
    LessThan,
    GreaterThan,
    /// Equality of terms. Unlike [FunctionSymbol::Equal], it never raises a type error.
    StrictEquality,
    IsNull,
    EffectiveBooleanValue,
    Add,
    Subtract,
    Multiply,
    Divide,
    UnaryPlus,
    UnaryMinus,
    Bound,
    Coalesce,
    If,
    Builtin(BuiltinFunction),
    /// The `IRI` function that resolves relative IRIs against `base`.
    Iri {
        base: Option<String>,
    },
    BNode,
    /// Creates a blank node from a label and the values of the other arguments. Used for blank
    /// nodes in `INSERT` templates, which must be fresh for every solution.
    BNodeTemplate,
    /// A cast to an XSD datatype, e.g., `xsd:integer(?x)`.
    Cast(NamedNode),
    Aggregate(AggregateFunction),
}

impl FunctionSymbol {
    /// Returns the [Arity] of this symbol.
    pub fn arity(&self) -> Arity {
        match self {
            FunctionSymbol::And | FunctionSymbol::Or => Arity::AtLeast(2),
            FunctionSymbol::Equal
            | FunctionSymbol::SameTerm
            | FunctionSymbol::LessThan
            | FunctionSymbol::GreaterThan
            | FunctionSymbol::StrictEquality
            | FunctionSymbol::Add
            | FunctionSymbol::Subtract
            | FunctionSymbol::Multiply
            | FunctionSymbol::Divide => Arity::Exact(2),
            FunctionSymbol::Not
            | FunctionSymbol::IsNull
            | FunctionSymbol::EffectiveBooleanValue
            | FunctionSymbol::UnaryPlus
            | FunctionSymbol::UnaryMinus
            | FunctionSymbol::Bound
            | FunctionSymbol::Iri { .. }
            | FunctionSymbol::Cast(_) => Arity::Exact(1),
            FunctionSymbol::Coalesce | FunctionSymbol::BNodeTemplate => Arity::AtLeast(1),
            FunctionSymbol::If => Arity::Exact(3),
            FunctionSymbol::BNode => Arity::Range(0, 1),
            FunctionSymbol::Builtin(builtin) => builtin.arity(),
            FunctionSymbol::Aggregate(aggregate) => match aggregate.kind {
                AggregateKind::Count => Arity::Range(0, 1),
                _ => Arity::Exact(1),
            },
        }
    }

    /// Returns whether the result of this symbol is always an `xsd:boolean` (or NULL).
    pub fn returns_boolean(&self) -> bool {
        match self {
            FunctionSymbol::And
            | FunctionSymbol::Or
            | FunctionSymbol::Not
            | FunctionSymbol::Equal
            | FunctionSymbol::SameTerm
            | FunctionSymbol::LessThan
            | FunctionSymbol::GreaterThan
            | FunctionSymbol::StrictEquality
            | FunctionSymbol::IsNull
            | FunctionSymbol::EffectiveBooleanValue
            | FunctionSymbol::Bound => true,
            FunctionSymbol::Builtin(builtin) => builtin.returns_boolean(),
            _ => false,
        }
    }

    /// Returns whether the result may be NULL even though all arguments are non-null.
    pub fn may_return_null(&self) -> bool {
        match self {
            FunctionSymbol::And
            | FunctionSymbol::Or
            | FunctionSymbol::Not
            | FunctionSymbol::StrictEquality
            | FunctionSymbol::SameTerm
            | FunctionSymbol::IsNull
            | FunctionSymbol::Bound
            | FunctionSymbol::Coalesce
            | FunctionSymbol::BNode
            | FunctionSymbol::BNodeTemplate => false,
            FunctionSymbol::Builtin(builtin) => !builtin.is_total(),
            // An empty group yields an unbound value for every aggregate but COUNT.
            FunctionSymbol::Aggregate(aggregate) => aggregate.kind != AggregateKind::Count,
            _ => true,
        }
    }

    /// Returns whether a NULL argument makes the whole result NULL.
    pub(crate) fn is_strict(&self) -> bool {
        !matches!(
            self,
            FunctionSymbol::And
                | FunctionSymbol::Or
                | FunctionSymbol::IsNull
                | FunctionSymbol::Bound
                | FunctionSymbol::Coalesce
                | FunctionSymbol::If
                | FunctionSymbol::BNodeTemplate
                | FunctionSymbol::Aggregate(_)
        )
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, FunctionSymbol::Aggregate(_))
    }
}

impl Display for FunctionSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FunctionSymbol::And => "AND",
            FunctionSymbol::Or => "OR",
            FunctionSymbol::Not => "NOT",
            FunctionSymbol::Equal => "EQ",
            FunctionSymbol::SameTerm => "SAME_TERM",
            FunctionSymbol::LessThan => "LT",
            FunctionSymbol::GreaterThan => "GT",
            FunctionSymbol::StrictEquality => "STRICT_EQ",
            FunctionSymbol::IsNull => "IS_NULL",
            FunctionSymbol::EffectiveBooleanValue => "EBV",
            FunctionSymbol::Add => "ADD",
            FunctionSymbol::Subtract => "SUBTRACT",
            FunctionSymbol::Multiply => "MULTIPLY",
            FunctionSymbol::Divide => "DIVIDE",
            FunctionSymbol::UnaryPlus => "UNARY_PLUS",
            FunctionSymbol::UnaryMinus => "UNARY_MINUS",
            FunctionSymbol::Bound => "BOUND",
            FunctionSymbol::Coalesce => "COALESCE",
            FunctionSymbol::If => "IF",
            FunctionSymbol::Builtin(builtin) => builtin.name(),
            FunctionSymbol::Iri { .. } => "IRI",
            FunctionSymbol::BNode => "BNODE",
            FunctionSymbol::BNodeTemplate => "BNODE_TEMPLATE",
            FunctionSymbol::Cast(datatype) => return write!(f, "CAST{datatype}"),
            FunctionSymbol::Aggregate(aggregate) => return write!(f, "{aggregate}"),
        };
        f.write_str(name)
    }
}

impl Display for AggregateFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match &self.kind {
            AggregateKind::Count => "COUNT",
            AggregateKind::Sum => "SUM",
            AggregateKind::Avg => "AVG",
            AggregateKind::Min => "MIN",
            AggregateKind::Max => "MAX",
            AggregateKind::Sample => "SAMPLE",
            AggregateKind::GroupConcat { .. } => "GROUP_CONCAT",
        };
        f.write_str(name)?;
        if self.distinct {
            f.write_str("_DISTINCT")?;
        }
        if let AggregateKind::GroupConcat { separator } = &self.kind {
            write!(f, "[{separator:?}]")?;
        }
        Ok(())
    }
}
