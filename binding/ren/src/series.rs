//! Positional access shared by arrays and strings.
//!
//! A series value is a reference to shared storage plus an index. Indexing
//! through [`Series::at`] is 1-based and relative to that index: `at(1)` is
//! the item under the index, `at(length + 1)` and beyond yield `Ok(None)`,
//! and `at(0)` or a negative index is a usage error.

use ren_cell::Runtime;

use crate::backend::Backend;
use crate::{AnyValue, RenError, RenResult, Subtype};

pub trait Series: Subtype {
    /// Items from the current index to the tail.
    fn length(&self) -> RenResult<usize> {
        let value = self.as_value();
        let tail = value.engine().call(|rt| rt.series_tail(value.cell()))?;
        Ok(tail.saturating_sub(Backend::series_index(value.cell())))
    }

    /// The item `index` positions in, counting the current one as 1.
    fn at(&self, index: i64) -> RenResult<Option<AnyValue>> {
        let offset = usize::try_from(index)
            .ok()
            .filter(|&i| i > 0)
            .ok_or_else(|| RenError::usage(format!("series index must be 1 or more, got {index}")))?;
        let value = self.as_value();
        let pos = Backend::series_index(value.cell()).saturating_add(offset - 1);
        pick(value, pos)
    }

    /// Items from the current index to the tail, in order.
    fn iter(&self) -> SeriesIter {
        let value = self.as_value().clone();
        let pos = Backend::series_index(value.cell());
        SeriesIter {
            value,
            pos,
            done: false,
        }
    }

    /// A movable position over a copy of this reference. The storage is
    /// shared; only the cursor's own index moves.
    fn cursor(&self) -> SeriesCursor<Self> {
        SeriesCursor {
            series: self.clone(),
        }
    }
}

fn pick(value: &AnyValue, pos: usize) -> RenResult<Option<AnyValue>> {
    let engine = value.engine();
    let picked = engine.call(|rt| rt.series_pick(value.cell(), pos))?;
    Ok(picked.map(|cell| AnyValue::from_cell(cell, engine)))
}

/// Iterator over a series. A backend failure is yielded once and ends the
/// iteration.
pub struct SeriesIter {
    value: AnyValue,
    pos: usize,
    done: bool,
}

impl Iterator for SeriesIter {
    type Item = RenResult<AnyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match pick(&self.value, self.pos) {
            Ok(Some(item)) => {
                self.pos += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl std::iter::FusedIterator for SeriesIter {}

/// A series reference whose index can be moved.
#[derive(Clone, Debug)]
pub struct SeriesCursor<T: Series> {
    series: T,
}

impl<T: Series> SeriesCursor<T> {
    /// 0-based index into the underlying storage.
    pub fn position(&self) -> usize {
        Backend::series_index(self.series.as_value().cell())
    }

    fn seek(&mut self, index: usize) {
        let mut cell = *self.series.as_value().cell();
        Backend::set_series_index(&mut cell, index);
        self.series.value_mut().set_cell(cell);
    }

    fn storage_tail(&self) -> RenResult<usize> {
        let value = self.series.as_value();
        value.engine().call(|rt| rt.series_tail(value.cell()))
    }

    pub fn head(&mut self) -> &mut Self {
        self.seek(0);
        self
    }

    pub fn tail(&mut self) -> RenResult<&mut Self> {
        let tail = self.storage_tail()?;
        self.seek(tail);
        Ok(self)
    }

    pub fn is_tail(&self) -> RenResult<bool> {
        Ok(self.position() >= self.storage_tail()?)
    }

    /// Step forward one item. Stays put at the tail.
    pub fn advance(&mut self) -> RenResult<&mut Self> {
        let tail = self.storage_tail()?;
        let pos = self.position();
        if pos < tail {
            self.seek(pos + 1);
        }
        Ok(self)
    }

    /// Step back one item. Stays put at the head.
    pub fn retreat(&mut self) -> &mut Self {
        let pos = self.position();
        self.seek(pos.saturating_sub(1));
        self
    }

    /// Like [`advance`](Self::advance), returning the position before the
    /// step.
    pub fn post_advance(&mut self) -> RenResult<usize> {
        let before = self.position();
        self.advance()?;
        Ok(before)
    }

    pub fn post_retreat(&mut self) -> usize {
        let before = self.position();
        self.retreat();
        before
    }

    /// The item under the cursor, `None` at the tail.
    pub fn get(&self) -> RenResult<Option<AnyValue>> {
        pick(self.series.as_value(), self.position())
    }

    pub fn length(&self) -> RenResult<usize> {
        self.series.length()
    }

    pub fn series(&self) -> &T {
        &self.series
    }

    pub fn into_value(self) -> T {
        self.series
    }
}
