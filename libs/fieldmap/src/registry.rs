use std::collections::HashMap;

use crate::config::StateConfig;
use crate::error::{RecordError, Result};
use crate::record::Record;
use crate::state::{ImportState, State};

type Constructor = fn() -> Box<dyn Record>;

fn construct<T: Record + Default>() -> Box<dyn Record> {
    Box::new(T::default())
}

/// Registry of record types that can be rebuilt from exported state.
///
/// Types are keyed by `(module_path, type_name)`, the same pair written into
/// the reserved keys by [`export_state`](crate::state::ExportState::export_state).
///
/// Uses interior mutability so types can be registered through a shared reference.
#[derive(Debug, Default)]
pub struct Registry {
    constructors: std::sync::RwLock<HashMap<(String, String), Constructor>>,
    config: StateConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry reading reserved keys as named by `config`.
    pub fn with_config(config: StateConfig) -> Self {
        Self {
            constructors: Default::default(),
            config,
        }
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    /// Register `T`. Registering the same type twice is a no-op.
    ///
    /// Fails with `ReservedKey` if a field of `T` is named like one of the
    /// registry's reserved keys, since its state could not be restored.
    pub fn register<T: Record + Default>(&self) -> Result<()> {
        let schema = T::default().schema();
        self.config.check_schema(schema)?;
        let key = (
            schema.module_path.to_string(),
            schema.type_name.to_string(),
        );
        let mut guard = match self.constructors.write() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("record registry write lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard.insert(key, construct::<T>);
        tracing::debug!(record = %schema.qualified_name(), "registered record type");
        Ok(())
    }

    pub fn contains(&self, module_path: &str, type_name: &str) -> bool {
        self.constructor(module_path, type_name).is_some()
    }

    /// Qualified names (`module_path::type_name`) of every registered type.
    pub fn type_names(&self) -> Vec<String> {
        let guard = match self.constructors.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("record registry read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard
            .keys()
            .map(|(module_path, type_name)| format!("{module_path}::{type_name}"))
            .collect()
    }

    /// Build a default instance of the registered type.
    pub fn create(&self, module_path: &str, type_name: &str) -> Result<Box<dyn Record>> {
        let constructor = self.constructor(module_path, type_name).ok_or_else(|| {
            RecordError::UnregisteredType {
                module_path: module_path.to_string(),
                type_name: type_name.to_string(),
            }
        })?;
        Ok(constructor())
    }

    /// Rebuild a record from exported state.
    ///
    /// Reads the reserved keys to pick the type, constructs a default instance
    /// and applies [`import_state`](ImportState::import_state_with) to it.
    pub fn restore(&self, state: &State) -> Result<Box<dyn Record>> {
        let type_name = self.reserved(state, &self.config.type_key)?;
        let module_path = self.reserved(state, &self.config.module_key)?;

        let mut record = self.create(module_path, type_name)?;
        record
            .import_state_with(state, &self.config)
            .map_err(|e| e.with_context(type_name))?;
        tracing::debug!(record = type_name, module = module_path, "restored record");
        Ok(record)
    }

    fn reserved<'s>(&self, state: &'s State, key: &str) -> Result<&'s str> {
        state
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| RecordError::MissingTypeKey(key.to_string()))
    }

    fn constructor(&self, module_path: &str, type_name: &str) -> Option<Constructor> {
        let guard = match self.constructors.read() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("record registry read lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        guard
            .get(&(module_path.to_string(), type_name.to_string()))
            .copied()
    }
}
