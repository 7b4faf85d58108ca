use crate::error::ConvertError;

use super::Value;

/// Conversion from a raw column value into a Rust value.
///
/// NULL is rejected with [`ConvertError::UnexpectedNull`] by every
/// implementation except `Option<T>` and `Value`, which tolerate absence.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ConvertError>;
}

fn mismatch(expected: &'static str, found: &Value) -> ConvertError {
    match found {
        Value::Null => ConvertError::UnexpectedNull,
        other => ConvertError::Mismatch {
            expected,
            found: other.type_name(),
        },
    }
}

macro_rules! impl_from_value_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(value: &Value) -> Result<Self, ConvertError> {
                    match value {
                        Value::Int(i) => <$t>::try_from(*i).map_err(|_| ConvertError::OutOfRange {
                            expected: stringify!($t),
                            value: i.to_string(),
                        }),
                        Value::Text(s) => s.trim().parse::<$t>().map_err(|_| ConvertError::Parse {
                            expected: stringify!($t),
                            text: s.clone(),
                        }),
                        other => Err(mismatch(stringify!($t), other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Largest magnitude an `f64` holds exactly for every integer up to it.
const F64_EXACT_INT: i64 = 1 << f64::MANTISSA_DIGITS;
const F32_EXACT_INT: i64 = 1 << f32::MANTISSA_DIGITS;

fn exact_int(i: i64, limit: i64, expected: &'static str) -> Result<i64, ConvertError> {
    if i.unsigned_abs() > limit as u64 {
        return Err(ConvertError::OutOfRange {
            expected,
            value: i.to_string(),
        });
    }
    Ok(i)
}

fn narrow_f32(x: f64) -> Result<f32, ConvertError> {
    let narrowed = x as f32;
    if x.is_finite() && !narrowed.is_finite() {
        return Err(ConvertError::OutOfRange {
            expected: "f32",
            value: x.to_string(),
        });
    }
    Ok(narrowed)
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Float(x) => Ok(*x),
            Value::Int(i) => exact_int(*i, F64_EXACT_INT, "f64").map(|i| i as f64),
            Value::Text(s) => s.trim().parse().map_err(|_| ConvertError::Parse {
                expected: "f64",
                text: s.clone(),
            }),
            other => Err(mismatch("f64", other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Float(x) => narrow_f32(*x),
            Value::Int(i) => exact_int(*i, F32_EXACT_INT, "f32").map(|i| i as f32),
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ConvertError::Parse {
                    expected: "f32",
                    text: s.clone(),
                })
                .and_then(narrow_f32),
            other => Err(mismatch("f32", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            Value::Int(i) => Err(ConvertError::OutOfRange {
                expected: "bool",
                value: i.to_string(),
            }),
            Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(true),
                "false" | "f" | "0" => Ok(false),
                _ => Err(ConvertError::Parse {
                    expected: "bool",
                    text: s.clone(),
                }),
            },
            other => Err(mismatch("bool", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Bytes(b) => Ok(String::from_utf8(b.clone())?),
            other => Err(mismatch("String", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Bytes(b) => Ok(b.clone()),
            Value::Text(s) => Ok(s.clone().into_bytes()),
            other => Err(mismatch("Vec<u8>", other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        Ok(value.clone())
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, ConvertError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
