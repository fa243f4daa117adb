//! Explicit conversion of input entries and rule results to activities.
//!
//! Anything number-like is accepted and widened to `f64`. Values that are not
//! numbers (JSON strings, nulls, arrays...) convert to `None`, which callers
//! turn into a conversion or return-type error.

use crate::error::{EvolveError, Result};
use serde_json::Value;

/// A value that may be interpreted as a floating-point activity.
pub trait Numeric {
    /// The value as an `f64`, or `None` if it is not a number.
    fn to_activity(&self) -> Option<f64>;

    /// Short name of the value's kind, used in error messages.
    fn kind(&self) -> &'static str {
        "number"
    }
}

macro_rules! impl_numeric_lossless {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                #[inline]
                fn to_activity(&self) -> Option<f64> {
                    Some(f64::from(*self))
                }
            }
        )*
    };
}

macro_rules! impl_numeric_cast {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                #[inline]
                fn to_activity(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

impl_numeric_lossless!(f64, f32, i8, i16, i32, u8, u16, u32);
impl_numeric_cast!(i64, i128, isize, u64, u128, usize);

impl Numeric for bool {
    fn to_activity(&self) -> Option<f64> {
        Some(if *self { 1.0 } else { 0.0 })
    }

    fn kind(&self) -> &'static str {
        "bool"
    }
}

impl Numeric for Value {
    fn to_activity(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            Value::Bool(b) => b.to_activity(),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl<T: Numeric + ?Sized> Numeric for &T {
    fn to_activity(&self) -> Option<f64> {
        (**self).to_activity()
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn to_activity(&self) -> Option<f64> {
        self.as_ref().and_then(Numeric::to_activity)
    }

    fn kind(&self) -> &'static str {
        match self {
            Some(v) => v.kind(),
            None => "none",
        }
    }
}

/// Converts a row of inputs, naming the offending entry as `label[i]`.
pub fn convert_row<T: Numeric>(values: &[T], label: &str) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.to_activity()
                .ok_or_else(|| EvolveError::conversion(format!("{label}[{i}]"), v.kind()))
        })
        .collect()
}
