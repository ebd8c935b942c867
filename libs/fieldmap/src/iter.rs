use core::ops::Range;
use core::slice;

use crate::record::Record;
use crate::schema::Field;
use crate::value::Value;

/// Field names in declaration order.
///
/// See [`RecordMapping::keys`][crate::mapping::RecordMapping::keys].
pub struct Keys {
    iter: slice::Iter<'static, Field>,
}

impl Keys {
    #[inline]
    pub(crate) fn new(fields: &'static [Field]) -> Self {
        Self {
            iter: fields.iter(),
        }
    }
}

impl Iterator for Keys {
    type Item = &'static str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.iter.next()?.name)
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        Some(self.iter.nth(n)?.name)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl DoubleEndedIterator for Keys {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        Some(self.iter.next_back()?.name)
    }
}

impl ExactSizeIterator for Keys {}

/// Field values in declaration order.
///
/// See [`RecordMapping::values`][crate::mapping::RecordMapping::values].
pub struct Values<'a, R: ?Sized> {
    record: &'a R,
    range: Range<usize>,
}

impl<'a, R: ?Sized + Record> Values<'a, R> {
    #[inline]
    pub(crate) fn new(record: &'a R) -> Self {
        Self {
            record,
            range: 0..record.schema().len(),
        }
    }
}

impl<R: ?Sized + Record> Iterator for Values<'_, R> {
    type Item = Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.record.field(self.range.next()?)
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.record.field(self.range.nth(n)?)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<R: ?Sized + Record> DoubleEndedIterator for Values<'_, R> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.record.field(self.range.next_back()?)
    }
}

impl<R: ?Sized + Record> ExactSizeIterator for Values<'_, R> {}

/// `(name, value)` pairs in declaration order.
///
/// See [`RecordMapping::items`][crate::mapping::RecordMapping::items].
pub struct Items<'a, R: ?Sized> {
    record: &'a R,
    range: Range<usize>,
}

impl<'a, R: ?Sized + Record> Items<'a, R> {
    #[inline]
    pub(crate) fn new(record: &'a R) -> Self {
        Self {
            record,
            range: 0..record.schema().len(),
        }
    }

    fn item(&self, position: usize) -> Option<(&'static str, Value)> {
        let name = self.record.schema().name(position)?;
        Some((name, self.record.field(position)?))
    }
}

impl<R: ?Sized + Record> Iterator for Items<'_, R> {
    type Item = (&'static str, Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let position = self.range.next()?;
        self.item(position)
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        let position = self.range.nth(n)?;
        self.item(position)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<R: ?Sized + Record> DoubleEndedIterator for Items<'_, R> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let position = self.range.next_back()?;
        self.item(position)
    }
}

impl<R: ?Sized + Record> ExactSizeIterator for Items<'_, R> {}
