//! Explicit numeric coercion rules for loosely-typed JSON values.
//!
//! Runtime data and schema constraints may carry the same number as an
//! integer or as a float depending on how they were decoded (`40` vs `40.0`).
//! [`Numeric`] makes the comparison rules total and independent of any
//! host-language promotion:
//! - integer vs integer compares exactly (via `i128`)
//! - anything involving a float compares as `f64`

use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// A numeric JSON value, keeping the representation it was decoded with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Numeric {
    /// Returns the numeric view of a JSON value, or `None` for non-numbers.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let Value::Number(n) = value else {
            return None;
        };
        if let Some(i) = n.as_i64() {
            Some(Self::Int(i))
        } else if let Some(u) = n.as_u64() {
            Some(Self::UInt(u))
        } else {
            n.as_f64().map(Self::Float)
        }
    }

    /// Lossy conversion to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(i) => i as f64,
            Self::UInt(u) => u as f64,
            Self::Float(f) => f,
        }
    }

    /// Returns true for integers and for finite floats without a fractional part.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        match *self {
            Self::Int(_) | Self::UInt(_) => true,
            Self::Float(f) => f.is_finite() && f.fract() == 0.0,
        }
    }

    /// Returns the value as `i64` if it is integral and in range.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(i) => Some(i),
            Self::UInt(u) => i64::try_from(u).ok(),
            Self::Float(f) => {
                if self.is_integral() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
        }
    }

    fn as_i128(&self) -> Option<i128> {
        match *self {
            Self::Int(i) => Some(i128::from(i)),
            Self::UInt(u) => Some(i128::from(u)),
            Self::Float(_) => None,
        }
    }

    /// Compares two numbers across representations.
    ///
    /// Returns `None` only when a NaN is involved.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self.as_i128(), other.as_i128()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::UInt(u) => write!(f, "{u}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// Equality used for enum membership and search filters: numbers are equal
/// when numerically equal regardless of representation, everything else is
/// compared structurally.
#[must_use]
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    match (Numeric::from_value(a), Numeric::from_value(b)) {
        (Some(x), Some(y)) => x.compare(&y) == Some(Ordering::Equal),
        _ => a == b,
    }
}
