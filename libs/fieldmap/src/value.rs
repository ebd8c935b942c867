use crate::error::{RecordError, Result};
use crate::state::ExportState;

/// Dynamic field value, as seen through mapping-style access.
///
/// Strategy by type:
/// - Scalars (Bool, Int, UInt, Float): copied out of the field
/// - Str: owned copy of the field's string
/// - List, Map: recursive, built element by element
///
/// A nested record presents itself as a `Map` of its items in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Only produced for integers above `i64::MAX`.
    UInt(u64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Ordered key-value pairs. Keys are unique.
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Short name of the variant, used in conversion error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Look up an entry of a `Map` value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(v),
            Value::Int(v) => serde_json::Value::from(v),
            Value::UInt(v) => serde_json::Value::from(v),
            // JSON has no representation for NaN or infinities.
            Value::Float(v) => serde_json::Number::from_f64(v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(v) => serde_json::Value::String(v),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Value::Int(v)
                } else if let Some(v) = n.as_u64() {
                    Value::UInt(v)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(v) => Value::Str(v),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(entries) => {
                Value::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    String => Str,
    &str => Str,
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::UInt(v),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

/// Conversion between a concrete field type and [`Value`].
///
/// Implemented for scalars, `String`, `Option<T>`, `Vec<T>`, [`Value`] itself
/// (an untyped field) and every `#[derive(Record)]` type.
pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    /// Convert a dynamic value into the field type.
    ///
    /// Scalar mismatches report an [`RecordError::InvalidValue`] with an empty
    /// field name; the caller attaches the field via
    /// [`RecordError::with_context`].
    fn from_value(value: Value) -> Result<Self>;

    /// Capability check for nested state export.
    ///
    /// Types that can export their own state return `Some(self)`; everything
    /// else is exported as a plain value.
    fn as_export(&self) -> Option<&dyn ExportState> {
        None
    }
}

fn mismatch<T>(expected: &str, found: &Value) -> Result<T> {
    Err(RecordError::invalid_value(
        "",
        format!("expected {expected}, found {}", found.kind()),
    ))
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => mismatch("bool", &other),
        }
    }
}

macro_rules! int_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(v) => Value::Int(v),
                        Err(_) => Value::UInt(*self as u64),
                    }
                }

                fn from_value(value: Value) -> Result<Self> {
                    let converted = match &value {
                        Value::Int(v) => <$ty>::try_from(*v).ok(),
                        Value::UInt(v) => <$ty>::try_from(*v).ok(),
                        _ => return mismatch(stringify!($ty), &value),
                    };
                    converted.ok_or_else(|| {
                        RecordError::invalid_value(
                            "",
                            format!("{value:?} does not fit in {}", stringify!($ty)),
                        )
                    })
                }
            }
        )*
    };
}

int_field_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            other => mismatch("f64", &other),
        }
    }
}

impl FieldValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Str(v) => Ok(v),
            other => mismatch("string", &other),
        }
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn as_export(&self) -> Option<&dyn ExportState> {
        self.as_ref().and_then(FieldValue::as_export)
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| T::from_value(item).map_err(|e| e.with_context(i)))
                .collect(),
            other => mismatch("list", &other),
        }
    }
}
