use crate::error::{RecordError, Result};
use crate::iter::{Items, Keys, Values};
use crate::key::Key;
use crate::record::Record;
use crate::value::Value;

/// Mapping-style access over any [`Record`].
///
/// Field names are the keys, in declaration order. Every method delegates to
/// the record's own storage; nothing is cached.
///
/// Equality is identity: [`same_instance`](Self::same_instance) is true only
/// for the very same instance. Records do not implement `PartialEq`, and two
/// records holding equal values are still different mappings.
///
/// # Examples
///
/// ```
/// use fieldmap::prelude::*;
///
/// #[derive(Record, Clone, Default)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// let mut p = Point { x: 1, y: 2 };
/// assert_eq!(p.len(), 2);
/// assert_eq!(p.get("y")?, Value::Int(2));
/// assert_eq!(p.get(0)?, Value::Int(1));
///
/// p.set("x", Value::Int(10))?;
/// assert_eq!(p.x, 10);
///
/// assert!(p.keys().eq(["x", "y"]));
/// # Ok::<_, fieldmap::RecordError>(())
/// ```
pub trait RecordMapping: Record {
    /// Number of declared fields.
    fn len(&self) -> usize {
        self.schema().len()
    }

    fn is_empty(&self) -> bool {
        self.schema().is_empty()
    }

    /// Test if `name` is a declared field.
    fn contains_key(&self, name: &str) -> bool {
        self.schema().contains(name)
    }

    /// Key membership for a dynamic value.
    ///
    /// This asks "is `value` a key", not "is `value` stored in a field": only a
    /// string equal to a field name matches.
    fn contains(&self, value: &Value) -> bool {
        match value {
            Value::Str(name) => self.contains_key(name),
            _ => false,
        }
    }

    fn keys(&self) -> Keys {
        Keys::new(self.schema().fields)
    }

    fn values(&self) -> Values<'_, Self> {
        Values::new(self)
    }

    fn items(&self) -> Items<'_, Self> {
        Items::new(self)
    }

    fn get_by_name(&self, name: &str) -> Result<Value> {
        let position = self.position_of(name)?;
        self.field(position)
            .ok_or_else(|| RecordError::UnknownField(name.to_string()))
    }

    /// Value at `index` in declaration order. Negative indices do not wrap.
    fn get_by_index(&self, index: i64) -> Result<Value> {
        let position = self.checked_position(index)?;
        self.field(position).ok_or(RecordError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    fn get<'k>(&self, key: impl Into<Key<'k>>) -> Result<Value> {
        match key.into() {
            Key::Name(name) => self.get_by_name(name),
            Key::Index(index) => self.get_by_index(index),
        }
    }

    /// Like [`get`](Self::get), but an undeclared name yields `default`.
    ///
    /// Index keys stay strict: an out of range index is still an error.
    fn get_or<'k>(&self, key: impl Into<Key<'k>>, default: Value) -> Result<Value> {
        match key.into() {
            Key::Name(name) if !self.contains_key(name) => Ok(default),
            key => self.get(key),
        }
    }

    /// Get with a key taken from dynamic data.
    fn get_value_key(&self, key: &Value) -> Result<Value> {
        self.get(Key::try_from(key)?)
    }

    fn set_by_name(&mut self, name: &str, value: Value) -> Result<()> {
        let position = self.position_of(name)?;
        tracing::trace!(field = name, "assigning field");
        self.set_field(position, value)
    }

    fn set_by_index(&mut self, index: i64, value: Value) -> Result<()> {
        let position = self.checked_position(index)?;
        tracing::trace!(index, "assigning field");
        self.set_field(position, value)
    }

    fn set<'k>(&mut self, key: impl Into<Key<'k>>, value: Value) -> Result<()> {
        match key.into() {
            Key::Name(name) => self.set_by_name(name, value),
            Key::Index(index) => self.set_by_index(index, value),
        }
    }

    /// Set with a key taken from dynamic data.
    fn set_value_key(&mut self, key: &Value, value: Value) -> Result<()> {
        self.set(Key::try_from(key)?, value)
    }

    /// Assign every `(name, value)` pair of `source`, in order.
    ///
    /// Not atomic: the first unknown name or unconvertible value stops the
    /// update, and assignments made before it stay applied.
    fn update<I, K>(&mut self, source: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut count = 0usize;
        for (name, value) in source {
            self.set_by_name(name.as_ref(), value)?;
            count += 1;
        }
        tracing::debug!(record = self.schema().type_name, count, "updated record");
        Ok(())
    }

    /// Identity comparison.
    ///
    /// Zero-sized records have no identity: distinct instances may share an
    /// address, so this is always false for them.
    fn same_instance(&self, other: &Self) -> bool {
        std::mem::size_of_val(self) != 0 && std::ptr::addr_eq(self, other)
    }

    fn not_same_instance(&self, other: &Self) -> bool {
        !self.same_instance(other)
    }

    /// A new instance with the same field values. Values are cloned, nested
    /// records included.
    fn copy(&self) -> Self
    where
        Self: Clone,
    {
        self.clone()
    }

    /// A copy with `overrides` applied through [`update`](Self::update).
    ///
    /// The source instance is never modified; on failure the partially
    /// updated copy is dropped.
    fn copy_with<I, K>(&self, overrides: I) -> Result<Self>
    where
        Self: Clone,
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut copy = self.clone();
        copy.update(overrides)?;
        tracing::debug!(record = self.schema().type_name, "copied record");
        Ok(copy)
    }

    #[doc(hidden)]
    fn position_of(&self, name: &str) -> Result<usize> {
        self.schema()
            .position(name)
            .ok_or_else(|| RecordError::UnknownField(name.to_string()))
    }

    #[doc(hidden)]
    fn checked_position(&self, index: i64) -> Result<usize> {
        let len = self.len();
        match usize::try_from(index) {
            Ok(position) if position < len => Ok(position),
            _ => Err(RecordError::IndexOutOfRange { index, len }),
        }
    }
}

impl<T: Record + ?Sized> RecordMapping for T {}
