use crate::error::RecordError;
use crate::value::Value;

/// Key for generic indexed access: a field name or a position.
///
/// Positions are signed so that negative indices can be rejected with
/// [`RecordError::IndexOutOfRange`] instead of wrapping around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Name(&'a str),
    Index(i64),
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Key::Name(name)
    }
}

impl From<i64> for Key<'_> {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key<'_> {
    fn from(index: i32) -> Self {
        Key::Index(index.into())
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

/// Keys taken from dynamic data: strings are names, integers are positions.
impl<'a> TryFrom<&'a Value> for Key<'a> {
    type Error = RecordError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(name) => Ok(Key::Name(name)),
            Value::Int(index) => Ok(Key::Index(*index)),
            Value::UInt(index) => Ok(Key::Index(i64::try_from(*index).unwrap_or(i64::MAX))),
            other => Err(RecordError::InvalidKeyType(other.kind().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dynamic_keys() {
        let name = Value::Str("x".into());
        assert_eq!(Key::try_from(&name), Ok(Key::Name("x")));
        assert_eq!(Key::try_from(&Value::Int(-1)), Ok(Key::Index(-1)));
        assert_eq!(
            Key::try_from(&Value::Float(1.0)),
            Err(RecordError::InvalidKeyType("float".into()))
        );
        assert_eq!(
            Key::try_from(&Value::Null),
            Err(RecordError::InvalidKeyType("null".into()))
        );
    }
}
