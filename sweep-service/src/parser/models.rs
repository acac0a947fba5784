// Parameter Range Models
// Scalar values and ordered parameter collections shared across the service

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// A single concrete parameter value.
///
/// Values arrive as text (tabular cells, YAML strings) and are coerced at the
/// boundary: integer when the text has no fractional separator, float when it
/// does, text otherwise. The interior pipeline only ever sees this tagged
/// form, so dependency and filter code can match on the kind it expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Coerce a textual cell into a scalar.
    ///
    /// Mirrors the simulation-input convention: `"5"` is an integer, `"5.0"`
    /// is a float, anything non-numeric stays text. Scientific notation
    /// without a decimal point (`"1e3"`) lands on the integer side.
    pub fn coerce(raw: &str) -> Scalar {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(f) => {
                if trimmed.contains('.') {
                    Scalar::Float(f)
                } else {
                    match trimmed.parse::<i64>() {
                        Ok(i) => Scalar::Int(i),
                        Err(_) => Scalar::Int(f as i64),
                    }
                }
            }
            Err(_) => Scalar::Text(trimmed.to_string()),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(s) => s.parse().ok(),
        }
    }

    /// Integer view of the value. Floats qualify only when they carry no
    /// fractional component.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    /// Whether the value is numeric (integer or float).
    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => {
                // Keep whole floats distinguishable from integers in
                // delimited output ("1.0", not "1").
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// One combination's worth of named values, in insertion order.
pub type ParamMap = IndexMap<String, Scalar>;

/// Parser output: every parameter's ordered value list, keyed in first-seen
/// declaration order.
pub type ParamRanges = IndexMap<String, Vec<Scalar>>;

/// Expand a `(lo, hi, count)` range into `count` evenly spaced samples,
/// inclusive of both ends. A count of one yields `lo` alone.
pub fn linspace(lo: f64, hi: f64, count: usize) -> Vec<Scalar> {
    if count == 1 {
        return vec![Scalar::Float(lo)];
    }
    let step = (hi - lo) / (count - 1) as f64;
    (0..count)
        .map(|i| Scalar::Float(lo + i as f64 * step))
        .collect()
}
