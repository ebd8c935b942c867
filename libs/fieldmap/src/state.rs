use crate::config::StateConfig;
use crate::error::Result;
use crate::mapping::RecordMapping;
use crate::record::Record;
use crate::value::Value;

/// Exported record state.
///
/// Reserved keys come first (`type_name`, `module_path` by default), followed
/// by one entry per field in declaration order:
///
/// ```text
/// { "type_name": "Point", "module_path": "app::geo", "x": 1, "y": 2 }
/// ```
///
/// Fields cannot use the default reserved keys; the derive rejects them:
///
/// ```compile_fail
/// use fieldmap::prelude::*;
///
/// #[derive(Record, Default)]
/// struct Asset {
///     type_name: String,
///     qty: i64,
/// }
/// ```
pub type State = serde_json::Map<String, serde_json::Value>;

/// Capability of producing an exported [`State`].
///
/// Every [`Record`] has it. Field types advertise it through
/// [`FieldValue::as_export`](crate::value::FieldValue::as_export), which is
/// how nested records end up stored as nested state.
pub trait ExportState {
    fn export_state_with(&self, config: &StateConfig) -> State;

    fn export_state(&self) -> State {
        self.export_state_with(&StateConfig::default())
    }
}

impl<T: Record + ?Sized> ExportState for T {
    fn export_state_with(&self, config: &StateConfig) -> State {
        let schema = self.schema();
        if let Err(e) = config.check_schema(schema) {
            tracing::warn!(error = %e, "exported state will not round-trip");
        }

        let mut state = State::new();
        state.insert(
            config.type_key.clone(),
            serde_json::Value::from(schema.type_name),
        );
        state.insert(
            config.module_key.clone(),
            serde_json::Value::from(schema.module_path),
        );

        for (position, field) in schema.fields.iter().enumerate() {
            let nested = if config.export_nested {
                self.field_export(position)
            } else {
                None
            };
            let value = match nested {
                Some(exportable) => serde_json::Value::Object(exportable.export_state_with(config)),
                None => self.field(position).unwrap_or(Value::Null).into(),
            };
            state.insert(field.name.to_string(), value);
        }

        tracing::debug!(record = schema.type_name, fields = schema.len(), "exported state");
        state
    }
}

/// Flat restore of an exported [`State`] onto an existing instance.
pub trait ImportState {
    fn import_state_with(&mut self, state: &State, config: &StateConfig) -> Result<()>;

    fn import_state(&mut self, state: &State) -> Result<()> {
        self.import_state_with(state, &StateConfig::default())
    }
}

impl<T: Record + ?Sized> ImportState for T {
    /// Assigns every non-reserved entry through
    /// [`update`](RecordMapping::update).
    ///
    /// The reserved keys identify the type to whoever constructs the instance
    /// and are skipped here. Nested objects arrive at their field as
    /// [`Value::Map`]; rebuilding them is up to the field type's conversion.
    ///
    /// Fails with `ReservedKey` before assigning anything if a field is named
    /// like one of `config`'s reserved keys.
    fn import_state_with(&mut self, state: &State, config: &StateConfig) -> Result<()> {
        config.check_schema(self.schema())?;
        let entries = state
            .iter()
            .filter(|(key, _)| !config.is_reserved(key))
            .map(|(key, value)| (key.as_str(), Value::from(value.clone())));
        self.update(entries)?;
        tracing::debug!(record = self.schema().type_name, "imported state");
        Ok(())
    }
}
