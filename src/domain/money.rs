use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Scale every stored monetary figure is rounded to.
pub const MONEY_SCALE: i64 = 2;

/// Absolute slack allowed between a claimed and a computed money value (0.01).
pub fn money_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 2)
}

/// Absolute slack allowed above a discount ceiling, in percentage points (0.001).
pub fn percentage_tolerance() -> BigDecimal {
    BigDecimal::new(1.into(), 3)
}

/// Largest amount a stored money column can hold (`NUMERIC(14, 2)`).
pub fn max_money() -> BigDecimal {
    BigDecimal::new(99_999_999_999_999i64.into(), MONEY_SCALE)
}

/// True when `value` cannot be stored in a money column.
pub fn exceeds_money_range(value: &BigDecimal) -> bool {
    value.abs() > max_money()
}

/// Round half-up to two decimal places.
pub fn round_money(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(MONEY_SCALE, RoundingMode::HalfUp)
}

/// True when `a` and `b` differ by strictly more than `tolerance`.
/// A difference equal to the tolerance still agrees.
pub fn differs_by_more_than(a: &BigDecimal, b: &BigDecimal, tolerance: &BigDecimal) -> bool {
    (a - b).abs() > *tolerance
}

/// Largest power-of-ten exponent, either way, a parsed value may carry.
const MAX_EXPONENT: i64 = 20;

/// Most significant digits a parsed value may carry.
const MAX_DIGITS: u64 = 40;

/// Parse a decimal from text, accepting surrounding whitespace.
///
/// Values whose exponent or digit count falls outside the bounds above are
/// refused, so later rescaling stays small.
pub fn parse_decimal(raw: &str) -> Option<BigDecimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = BigDecimal::from_str(trimmed).ok()?;
    let (_, scale) = value.as_bigint_and_exponent();
    if !(-MAX_EXPONENT..=MAX_EXPONENT).contains(&scale) || value.digits() > MAX_DIGITS {
        return None;
    }
    Some(value)
}

/// A numeric field as it arrives from a client: a JSON number, a numeric
/// string, or anything else (kept verbatim so it can be echoed back in
/// error details).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(Number),
    Text(String),
    Other(Value),
}

impl NumberLike {
    pub fn to_decimal(&self) -> Option<BigDecimal> {
        match self {
            NumberLike::Number(n) => parse_decimal(&n.to_string()),
            NumberLike::Text(s) => parse_decimal(s),
            NumberLike::Other(_) => None,
        }
    }

    /// Integral value, if the field holds a whole number.
    pub fn to_integer(&self) -> Option<i64> {
        let value = self.to_decimal()?;
        if value.with_scale(0) != value {
            return None;
        }
        value.to_i64()
    }

    /// Empty or whitespace-only strings count as "not provided".
    pub fn is_blank(&self) -> bool {
        match self {
            NumberLike::Text(s) => s.trim().is_empty(),
            NumberLike::Other(Value::Null) => true,
            _ => false,
        }
    }
}

impl From<i64> for NumberLike {
    fn from(value: i64) -> Self {
        NumberLike::Number(Number::from(value))
    }
}

impl From<&str> for NumberLike {
    fn from(value: &str) -> Self {
        NumberLike::Text(value.to_string())
    }
}

impl From<&BigDecimal> for NumberLike {
    fn from(value: &BigDecimal) -> Self {
        NumberLike::Text(value.to_string())
    }
}
