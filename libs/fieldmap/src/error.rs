/// Error returned by every fallible record operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    /// Name-based access to a field the record type does not declare.
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("index {index} out of range for record with {len} fields")]
    IndexOutOfRange { index: i64, len: usize },

    /// A dynamic key that is neither a name nor an index.
    #[error("invalid key type: {0}")]
    InvalidKeyType(String),

    /// A value that cannot be converted into the field's Rust type.
    #[error("invalid value for field '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// A field key that collides with a reserved state key.
    #[error("field '{field}' of {record} collides with reserved state key")]
    ReservedKey { record: String, field: String },

    #[error("state is missing reserved key '{0}'")]
    MissingTypeKey(String),

    #[error("no record type registered as {module_path}::{type_name}")]
    UnregisteredType {
        module_path: String,
        type_name: String,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl RecordError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        RecordError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Add context to the error.
    ///
    /// The variant is preserved. Field paths are joined with `.`, so a nested
    /// failure reads `outer.inner`.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            RecordError::UnknownField(name) => RecordError::UnknownField(format!("{ctx}.{name}")),
            RecordError::InvalidValue { field, message } if field.is_empty() => {
                RecordError::InvalidValue {
                    field: ctx.to_string(),
                    message,
                }
            }
            RecordError::InvalidValue { field, message } => RecordError::InvalidValue {
                field: format!("{ctx}.{field}"),
                message,
            },
            RecordError::Config(msg) => RecordError::Config(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}

pub type Result<T, E = RecordError> = std::result::Result<T, E>;

impl From<toml::de::Error> for RecordError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}
