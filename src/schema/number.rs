//! The `number` and `integer` testers.
//!
//! Non-numeric input is converted by reading the longest numeric prefix of
//! its string form, so `"12px"` becomes `12` and `" 3e2 "` becomes `300`.
//! The integer tester then rounds half up towards positive infinity.

use std::sync::LazyLock;

use regex::Regex;

use super::error::{Rejection, SchemaError, ValidationError};
use super::identifier::TypeName;
use super::tester::{Constraint, Resolution, Tester, bind_base, count_arg, number_arg};
use super::types::Arg;
use super::validator::Scope;
use super::value::{Value, format_number};

/// Largest magnitude an `f64` holds without losing integer precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Largest digit count accepted by `precision`.
const MAX_PRECISION: usize = 100;

/// Enough fractional digits to print any finite `f64` exactly.
const EXACT_DIGITS: usize = 1100;

static NUMERIC_PREFIX: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:Infinity|\d+\.?\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?)")
});

/// Reads the longest numeric prefix of `text`, ignoring leading
/// whitespace.
fn parse_prefix(text: &str) -> Option<f64> {
    let re = NUMERIC_PREFIX.as_ref().ok()?;
    let found = re.find(text.trim_start())?;
    found.as_str().parse().ok()
}

/// Rounds to the nearest whole number, breaking ties upwards.
fn round_half_up(n: f64) -> f64 {
    if n - n.floor() == 0.5 { n.ceil() } else { n.round() }
}

/// Returns `true` if `magnitude` lies exactly halfway between two
/// candidates with `digits` fractional digits.
fn is_tie(magnitude: f64, digits: usize) -> bool {
    let exact = format!("{magnitude:.width$}", width = EXACT_DIGITS);
    exact
        .split_once('.')
        .and_then(|(_, fraction)| fraction.get(digits..))
        .and_then(|tail| tail.strip_prefix('5'))
        .is_some_and(|rest| rest.bytes().all(|b| b == b'0'))
}

/// Rounds to `digits` fractional digits, breaking exact ties away from
/// zero.
///
/// Formatting alone breaks ties towards the even digit, so a tie is
/// printed from the next representable magnitude instead.
fn round_to_digits(x: f64, digits: usize) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let magnitude = x.abs();
    let target = if is_tie(magnitude, digits) {
        f64::from_bits(magnitude.to_bits() + 1)
    } else {
        magnitude
    };
    let rounded: f64 = format!("{target:.digits$}").parse().unwrap_or(magnitude);
    rounded.copysign(x)
}

/// Coerces to a number; with `integer` set, also rounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberTester {
    integer: bool,
}

impl NumberTester {
    /// The `number` tester.
    #[must_use]
    pub const fn number() -> Self {
        Self { integer: false }
    }

    /// The `integer` tester.
    #[must_use]
    pub const fn integer() -> Self {
        Self { integer: true }
    }

    fn to_number(value: &Value) -> Result<f64, Rejection> {
        let parsed = match value {
            Value::Number(n) => return Ok(*n),
            Value::String(s) => parse_prefix(s),
            _ => None,
        };
        // Conversion failures report under `number` even for integers.
        parsed.ok_or_else(|| {
            ValidationError::new(
                TypeName::Number.as_str(),
                ":label could not be converted to a number",
            )
            .into()
        })
    }
}

impl Tester for NumberTester {
    fn coerce(&self, value: Value) -> Result<Value, Rejection> {
        let n = Self::to_number(&value)?;
        Ok(Value::Number(if self.integer { round_half_up(n) } else { n }))
    }

    fn bind(&self, name: &str, arg: &Arg, _scope: &Scope<'_>) -> Result<Resolution, SchemaError> {
        let op = match name {
            "precision" => {
                let digits = count_arg(name, arg)?;
                if digits > MAX_PRECISION {
                    return Err(SchemaError::invalid_argument(
                        name,
                        format!("expected at most {MAX_PRECISION} digits"),
                    ));
                }
                NumberOp::Precision(digits)
            }
            "unsafe" => NumberOp::Unsafe,
            "greater" => NumberOp::Greater(number_arg(name, arg)?),
            "less" => NumberOp::Less(number_arg(name, arg)?),
            "max" => NumberOp::Max(number_arg(name, arg)?),
            "min" => NumberOp::Min(number_arg(name, arg)?),
            "multiple" => {
                let divisor = number_arg(name, arg)?;
                if divisor == 0.0 {
                    return Err(SchemaError::invalid_argument(
                        name,
                        "expected a non-zero number",
                    ));
                }
                NumberOp::Multiple(divisor)
            }
            "positive" => NumberOp::Positive,
            "negative" => NumberOp::Negative,
            "port" => NumberOp::Port,
            _ => return bind_base(name, arg),
        };
        Ok(Resolution::apply(op))
    }
}

#[derive(Debug, Clone, Copy)]
enum NumberOp {
    Precision(usize),
    Unsafe,
    Greater(f64),
    Less(f64),
    Max(f64),
    Min(f64),
    Multiple(f64),
    Positive,
    Negative,
    Port,
}

impl NumberOp {
    /// Returns the rejection message when `x` fails, else `None`.
    fn violation(self, x: f64) -> Option<String> {
        let fails = |failed: bool, message: String| failed.then_some(message);
        match self {
            Self::Precision(_) => None,
            Self::Unsafe => fails(
                x.abs() > MAX_SAFE_INTEGER,
                ":label is outside of safe number range".to_owned(),
            ),
            Self::Greater(n) => fails(
                x <= n,
                format!(":label is not greater than {}", format_number(n)),
            ),
            Self::Less(n) => fails(
                x >= n,
                format!(":label is not less than {}", format_number(n)),
            ),
            Self::Max(n) => fails(x > n, format!(":label is greater than {}", format_number(n))),
            Self::Min(n) => fails(x < n, format!(":label is less than {}", format_number(n))),
            Self::Multiple(n) => fails(
                x % n != 0.0,
                format!(":label is not multiple of {}", format_number(n)),
            ),
            Self::Positive => fails(x <= 0.0, ":label is not positive".to_owned()),
            Self::Negative => fails(x >= 0.0, ":label is not negative".to_owned()),
            Self::Port => fails(
                !(0.0..=65535.0).contains(&x) || x.fract() != 0.0,
                ":label is outside of port range".to_owned(),
            ),
        }
    }
}

impl Constraint for NumberOp {
    fn apply(&self, value: Value) -> Result<Value, Rejection> {
        let x = value
            .as_f64()
            .ok_or_else(|| Rejection::invalid(":label is not a number"))?;
        if let Some(message) = self.violation(x) {
            return Err(Rejection::Invalid(message));
        }
        match *self {
            Self::Precision(digits) => Ok(Value::Number(round_to_digits(x, digits))),
            _ => Ok(value),
        }
    }
}
