//! The `date` tester.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::{Rejection, SchemaError};
use super::tester::{Constraint, Resolution, Tester, bind_base};
use super::types::Arg;
use super::validator::Scope;
use super::value::Value;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Interprets a value as a point in time.
///
/// Dates pass through. Numbers are milliseconds since the Unix epoch.
/// Strings are tried as RFC 3339, then RFC 2822, then as a zone-less
/// date-time or a bare date, both taken as UTC.
#[must_use]
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Number(millis) => from_millis(*millis),
        Value::String(text) => parse_text(text.trim()),
        _ => None,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "finite millisecond counts outside the chrono range are rejected by it"
)]
fn from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(text) {
        return Some(date.with_timezone(&Utc));
    }
    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;
    Some(naive.and_utc())
}

/// Coerces to a [`Value::Date`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTester;

impl Tester for DateTester {
    fn coerce(&self, value: Value) -> Result<Value, Rejection> {
        parse_date(&value)
            .map(Value::Date)
            .ok_or_else(|| Rejection::invalid(":label could not be converted to a date"))
    }

    fn bind(&self, name: &str, arg: &Arg, _scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        let bound = || {
            arg.as_value()
                .and_then(parse_date)
                .ok_or_else(|| SchemaError::invalid_argument(name, "expected a date"))
        };
        match name {
            "after" => Ok(Resolution::apply(DateOp::After(bound()?))),
            "before" => Ok(Resolution::apply(DateOp::Before(bound()?))),
            _ => bind_base(name, arg),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DateOp {
    After(DateTime<Utc>),
    Before(DateTime<Utc>),
}

impl Constraint for DateOp {
    fn apply(&self, value: Value) -> Result<Value, Rejection> {
        let date =
            parse_date(&value).ok_or_else(|| Rejection::invalid(":label is not a date"))?;
        match self {
            Self::After(bound) if date < *bound => {
                Err(Rejection::invalid(":label is before the given date"))
            }
            Self::Before(bound) if date > *bound => {
                Err(Rejection::invalid(":label is after the given date"))
            }
            Self::After(_) | Self::Before(_) => Ok(value),
        }
    }
}
