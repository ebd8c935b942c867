//! Mapping-style access over fixed-schema records.
//!
//! A record is a plain struct deriving [`Record`]. Its fields stay ordinary,
//! typed struct members, and [`RecordMapping`] additionally exposes them as an
//! ordered key-value mapping: lookup by name or position, key/value/item
//! iteration, bulk `update` and `copy_with`. [`ExportState`] and
//! [`ImportState`] turn a record into a JSON-compatible [`State`] and back,
//! and a [`Registry`] rebuilds the right concrete type from exported state.
//!
//! ```
//! use fieldmap::prelude::*;
//!
//! #[derive(Record, Clone, Default)]
//! struct Account {
//!     owner: String,
//!     balance: i64,
//! }
//!
//! let account = Account { owner: "ada".into(), balance: 10 };
//! let richer = account.copy_with([("balance", Value::Int(20))])?;
//!
//! assert_eq!(richer.balance, 20);
//! assert_eq!(account.balance, 10);
//! assert!(!richer.same_instance(&account));
//!
//! let state = richer.export_state();
//! assert_eq!(state["type_name"], "Account");
//! assert_eq!(state["balance"], 20);
//! # Ok::<_, fieldmap::RecordError>(())
//! ```

extern crate self as fieldmap;

pub mod config;
pub mod error;
pub mod iter;
pub mod key;
pub mod mapping;
pub mod record;
pub mod registry;
pub mod schema;
pub mod state;
pub mod value;

pub use fieldmap_derive::Record;

pub use config::StateConfig;
pub use error::{RecordError, Result};
pub use key::Key;
pub use mapping::RecordMapping;
pub use record::Record;
pub use registry::Registry;
pub use schema::{Field, FieldDescriptor, Schema};
pub use state::{ExportState, ImportState, State};
pub use value::{FieldValue, Value};

/// Traits and types needed to declare and use records.
pub mod prelude {
    pub use crate::{
        ExportState, FieldValue, ImportState, Key, Record, RecordError, RecordMapping, State,
        Value,
    };
}
