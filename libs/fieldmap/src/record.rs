use std::any::Any;

use crate::error::Result;
use crate::schema::Schema;
use crate::state::ExportState;
use crate::value::Value;

/// A fixed-schema record: an ordered set of named, typed fields.
///
/// Normally implemented through `#[derive(Record)]`, which keeps the fields as
/// plain struct members so typed attribute access keeps working. Mapping-style
/// access is layered on top by [`RecordMapping`](crate::mapping::RecordMapping).
///
/// The trait is object safe; `Box<dyn Record>` is what the
/// [`Registry`](crate::registry::Registry) hands back.
pub trait Record: Any {
    fn schema(&self) -> &'static Schema;

    /// Value of the field at `position`, `None` when out of range.
    fn field(&self, position: usize) -> Option<Value>;

    /// Assign the field at `position`.
    ///
    /// Fails with `IndexOutOfRange` past the last field and with
    /// `InvalidValue` when `value` does not convert into the field's type.
    fn set_field(&mut self, position: usize, value: Value) -> Result<()>;

    /// Nested export capability of the field at `position`.
    fn field_export(&self, position: usize) -> Option<&dyn ExportState>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Record {
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    pub fn is<T: Record>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl std::fmt::Debug for dyn Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schema = self.schema();
        let mut map = f.debug_map();
        for (position, field) in schema.fields.iter().enumerate() {
            map.entry(&field.name, &self.field(position));
        }
        map.finish()
    }
}
