//! Crate-internal access to the raw cell.
//!
//! Only engine plumbing and subtype constructors build values out of bare
//! cells or rewrite a value's cell in place. Keeping those entry points here
//! is the whole of the wrapper's privileged surface.

use ren_cell::{Cell, Runtime};

use super::AnyValue;
use crate::backend::Backend;
use crate::{Engine, RenError, RenResult};

impl AnyValue {
    /// An empty wrapper not yet attached to anything.
    pub(crate) fn vacant(engine: &Engine) -> AnyValue {
        AnyValue {
            cell: Cell::TRASH,
            engine: engine.clone(),
            key: None,
        }
    }

    /// Wrap a cell the backend just produced. The cell must be valid.
    pub(crate) fn from_cell(cell: Cell, engine: &Engine) -> AnyValue {
        AnyValue {
            cell,
            engine: engine.clone(),
            key: engine.register(&cell),
        }
    }

    /// Register the current cell with `engine`. Returns `false`, leaving the
    /// wrapper unregistered, if the backend does not recognize the bits.
    pub(crate) fn try_finish_init(&mut self, engine: &Engine) -> bool {
        if Backend::classify(&self.cell).is_none() {
            return false;
        }
        if let Some(key) = self.key.take() {
            self.engine.release(key);
        }
        self.engine = engine.clone();
        self.key = engine.register(&self.cell);
        true
    }

    pub(crate) fn finish_init(&mut self, engine: &Engine) -> RenResult<()> {
        if self.try_finish_init(engine) {
            Ok(())
        } else {
            Err(RenError::Unbound(format!(
                "cell is not a valid {} value: {:?}",
                Backend::NAME,
                self.cell
            )))
        }
    }

    pub(crate) fn cell(&self) -> &Cell {
        &self.cell
    }

    /// Replace the cell, keeping the live-set entry in step.
    pub(crate) fn set_cell(&mut self, cell: Cell) {
        self.cell = cell;
        match self.key {
            Some(key) if Backend::needs_refcount(&cell) => {
                self.engine.update(key, &cell);
            }
            Some(key) => {
                self.key = None;
                self.engine.release(key);
            }
            None => self.key = self.engine.register(&cell),
        }
    }
}
