use serde::Deserialize;

use crate::error::RecordError;
use crate::schema::Schema;

/// Shape of exported state.
///
/// Parsed from TOML; every key is optional:
///
/// ```toml
/// type_key = "type_name"
/// module_key = "module_path"
/// export_nested = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    /// Reserved key holding the record's type name.
    #[serde(default = "default_type_key")]
    pub type_key: String,

    /// Reserved key holding the record's module path.
    #[serde(default = "default_module_key")]
    pub module_key: String,

    /// Store nested records as nested state (with their own reserved keys).
    /// When off, nested records are stored as plain mappings of their values.
    #[serde(default = "default_export_nested")]
    pub export_nested: bool,
}

fn default_type_key() -> String {
    "type_name".to_string()
}

fn default_module_key() -> String {
    "module_path".to_string()
}

fn default_export_nested() -> bool {
    true
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            type_key: default_type_key(),
            module_key: default_module_key(),
            export_nested: default_export_nested(),
        }
    }
}

impl StateConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, RecordError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RecordError::Config(format!("{path}: {e}")))?;
        Self::parse(&content).map_err(|e| e.with_context(path))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, RecordError> {
        let config: Self = toml::from_str(toml_str)?;
        if config.type_key == config.module_key {
            return Err(RecordError::Config(format!(
                "type_key and module_key must differ (both '{}')",
                config.type_key
            )));
        }
        Ok(config)
    }

    /// Test if `key` is one of the reserved type-identifying keys.
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.type_key || key == self.module_key
    }

    /// Fail if a field of `schema` is named like a reserved key.
    ///
    /// Such a field would overwrite the type identity on export and be
    /// skipped on import.
    pub fn check_schema(&self, schema: &Schema) -> Result<(), RecordError> {
        match schema.fields.iter().find(|f| self.is_reserved(f.name)) {
            Some(field) => Err(RecordError::ReservedKey {
                record: schema.qualified_name(),
                field: field.name.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(StateConfig::parse("").unwrap(), StateConfig::default());
    }

    #[test]
    fn overrides_keys() {
        let config = StateConfig::parse(
            r#"
            type_key = "__type__"
            export_nested = false
            "#,
        )
        .unwrap();
        assert_eq!(config.type_key, "__type__");
        assert_eq!(config.module_key, "module_path");
        assert!(!config.export_nested);
        assert!(config.is_reserved("__type__"));
        assert!(!config.is_reserved("type_name"));
    }

    #[test]
    fn rejects_colliding_keys() {
        let err = StateConfig::parse(r#"type_key = "module_path""#).unwrap_err();
        assert!(matches!(err, RecordError::Config(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            StateConfig::parse("nested = true"),
            Err(RecordError::Config(_))
        ));
    }

    #[test]
    fn detects_reserved_field_names() {
        const SCHEMA: Schema = Schema {
            type_name: "Tagged",
            module_path: "demo",
            fields: &[crate::schema::Field {
                name: "kind",
                type_name: "String",
            }],
        };
        assert_eq!(StateConfig::default().check_schema(&SCHEMA), Ok(()));

        let config = StateConfig::parse(r#"type_key = "kind""#).unwrap();
        assert_eq!(
            config.check_schema(&SCHEMA),
            Err(RecordError::ReservedKey {
                record: "demo::Tagged".into(),
                field: "kind".into(),
            })
        );
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = StateConfig::load("/nonexistent/fieldmap.toml").unwrap_err();
        assert!(matches!(err, RecordError::Config(msg) if msg.starts_with("/nonexistent")));
    }
}
