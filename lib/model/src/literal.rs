use crate::{Literal, ModelError, ModelResult, NamedNode};
use oxrdf::vocab::xsd;
use oxsdatatypes::{
    Boolean, Date, DateTime, DayTimeDuration, Decimal, Double, Duration, Float, GDay, GMonth,
    GMonthDay, GYear, GYearMonth, Integer, Time, YearMonthDuration,
};
use std::str::FromStr;

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Checks whether the lexical form of `literal` is valid for its datatype.
///
/// Only the XSD datatypes that SPARQL operates on are checked. Literals of any other datatype are
/// accepted as-is.
pub fn validate_literal(literal: &Literal) -> ModelResult<()> {
    let value = literal.value();
    let datatype = literal.datatype();

    let is_valid = if datatype == xsd::BOOLEAN {
        parses::<Boolean>(value)
    } else if is_integer_datatype(datatype.as_str()) {
        parses::<Integer>(value)
    } else if datatype == xsd::DECIMAL {
        parses::<Decimal>(value)
    } else if datatype == xsd::FLOAT {
        parses::<Float>(value)
    } else if datatype == xsd::DOUBLE {
        parses::<Double>(value)
    } else if datatype == xsd::DATE_TIME {
        parses::<DateTime>(value)
    } else if datatype == xsd::DATE {
        parses::<Date>(value)
    } else if datatype == xsd::TIME {
        parses::<Time>(value)
    } else if datatype == xsd::DURATION {
        parses::<Duration>(value)
    } else if datatype == xsd::DAY_TIME_DURATION {
        parses::<DayTimeDuration>(value)
    } else if datatype == xsd::YEAR_MONTH_DURATION {
        parses::<YearMonthDuration>(value)
    } else if datatype == xsd::G_YEAR {
        parses::<GYear>(value)
    } else if datatype == xsd::G_YEAR_MONTH {
        parses::<GYearMonth>(value)
    } else if datatype == xsd::G_MONTH {
        parses::<GMonth>(value)
    } else if datatype == xsd::G_MONTH_DAY {
        parses::<GMonthDay>(value)
    } else if datatype == xsd::G_DAY {
        parses::<GDay>(value)
    } else {
        true
    };

    if is_valid {
        Ok(())
    } else {
        Err(ModelError::InvalidLexicalForm(literal.clone()))
    }
}

/// Returns whether `iri` is in the XSD namespace (e.g., a cast function like `xsd:integer`).
pub fn is_xsd_datatype(iri: &NamedNode) -> bool {
    iri.as_str().starts_with(XSD_NAMESPACE)
}

/// Returns whether `datatype` is one of the numeric XSD datatypes.
pub(crate) fn is_numeric_datatype(datatype: &str) -> bool {
    datatype == xsd::DECIMAL.as_str()
        || datatype == xsd::FLOAT.as_str()
        || datatype == xsd::DOUBLE.as_str()
        || is_integer_datatype(datatype)
}

pub(crate) fn is_integer_datatype(datatype: &str) -> bool {
    [
        xsd::INTEGER,
        xsd::LONG,
        xsd::INT,
        xsd::SHORT,
        xsd::BYTE,
        xsd::NON_NEGATIVE_INTEGER,
        xsd::POSITIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::UNSIGNED_LONG,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_BYTE,
    ]
    .iter()
    .any(|candidate| candidate.as_str() == datatype)
}

fn parses<T: FromStr>(value: &str) -> bool {
    value.parse::<T>().is_ok()
}
