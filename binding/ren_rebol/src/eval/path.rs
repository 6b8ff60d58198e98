//! Path evaluation: `obj/field`, `block/2`, `func/refine`, `a/b: value`.

use ren_cell::Cell;

use super::{Escape, EvalResult, Interp};
use crate::compare;
use crate::errors;
use crate::heap::SeriesId;
use crate::layout::{self, tag};
use crate::mold;

impl Interp<'_> {
    /// Evaluate a path. With `invoke`, a function reached along the path is
    /// called, taking the remaining parts as refinements and its arguments
    /// from the array at `pos`.
    pub(crate) fn eval_path(
        &mut self,
        path: &Cell,
        sid: SeriesId,
        pos: usize,
        invoke: bool,
    ) -> Result<(Cell, usize), Escape> {
        let parts = self.heap.array_items(path)?;
        let Some((head, rest)) = parts.split_first() else {
            return Ok((layout::none(), pos));
        };
        let label = self.heap.name(head).to_owned();
        let mut value = self.path_head(head)?;

        for (k, part) in rest.iter().enumerate() {
            if invoke && matches!(layout::tag_of(&value), tag::NATIVE | tag::FUNCTION) {
                return self.invoke(value, &label, &rest[k..], sid, pos);
            }
            let selector = self.selector(part)?;
            value = self.select(path, &value, &selector)?;
        }

        if invoke && matches!(layout::tag_of(&value), tag::NATIVE | tag::FUNCTION) {
            return self.invoke(value, &label, &[], sid, pos);
        }
        Ok((value, pos))
    }

    /// Assign through a set-path.
    pub(crate) fn set_path(&mut self, path: &Cell, value: Cell) -> Result<(), Escape> {
        let parts = self.heap.array_items(path)?;
        let shown = || mold::mold(self.heap, path, false);
        let (Some(head), Some(last)) = (parts.first(), parts.last()) else {
            return Err(errors::invalid_path(shown(), "").into());
        };
        if parts.len() < 2 {
            return Err(errors::invalid_path(shown(), "").into());
        }
        let mut container = self.path_head(head)?;
        for part in parts.iter().take(parts.len() - 1).skip(1) {
            let selector = self.selector(part)?;
            container = self.select(path, &container, &selector)?;
        }
        let selector = self.selector(last)?;
        self.poke(path, &container, &selector, value)
    }

    fn path_head(&mut self, head: &Cell) -> EvalResult {
        match layout::tag_of(head) {
            tag::WORD => {
                let value = self.heap.get_var(head)?;
                if layout::is_unset(&value) {
                    return Err(errors::no_value(self.heap.name(head)).into());
                }
                Ok(value)
            }
            tag::GET_WORD => Ok(self.heap.get_var(head)?),
            tag::PAREN => self.do_array(head),
            _ => Ok(*head),
        }
    }

    fn selector(&mut self, part: &Cell) -> EvalResult {
        match layout::tag_of(part) {
            tag::PAREN => self.do_array(part),
            tag::GET_WORD => Ok(self.heap.get_var(part)?),
            _ => Ok(*part),
        }
    }

    /// One step of path selection.
    pub(crate) fn select(&mut self, path: &Cell, container: &Cell, selector: &Cell) -> EvalResult {
        let ct = layout::tag_of(container);
        let st = layout::tag_of(selector);

        if layout::is_context_tag(ct) && layout::is_word_tag(st) {
            let key = self.heap.name(selector).to_owned();
            return match self.heap.field(layout::frame_id(container), &key) {
                Some(value) => Ok(value),
                None => Err(self.bad_path(path, selector)),
            };
        }

        if layout::is_series_tag(ct) {
            if let Some(n) = layout::integer_value(selector) {
                return Ok(self.pick(container, n)?.unwrap_or_else(layout::none));
            }
            if layout::is_array_tag(ct) {
                let items = self.heap.array_items(container)?;
                let found = items
                    .iter()
                    .position(|item| compare::equal(self.heap, item, selector, false));
                return Ok(found
                    .and_then(|i| items.get(i + 1).copied())
                    .unwrap_or_else(layout::none));
            }
        }
        Err(self.bad_path(path, selector))
    }

    /// Item `n` (1-based, relative to the series index), `None` out of range.
    pub(crate) fn pick(&mut self, series: &Cell, n: i64) -> Result<Option<Cell>, Escape> {
        let index = layout::series_index(series);
        let Some(pos) = relative_pos(index, n) else {
            return Ok(None);
        };
        let id = layout::series_id(series);
        if layout::is_array_tag(layout::tag_of(series)) {
            Ok(self.heap.array_at(id, pos)?)
        } else {
            Ok(self.heap.text(id)?.get(pos).copied().map(layout::character))
        }
    }

    fn poke(&mut self, path: &Cell, container: &Cell, selector: &Cell, value: Cell) -> Result<(), Escape> {
        let ct = layout::tag_of(container);
        if layout::is_context_tag(ct) && layout::is_word_tag(layout::tag_of(selector)) {
            let frame = layout::frame_id(container);
            let canon = self.heap.symbols.canon(layout::word_symbol(selector));
            let f = self.heap.frame_mut(frame)?;
            return match f.find(canon) {
                Some(slot) => {
                    f.set(slot, value);
                    Ok(())
                }
                None => Err(self.bad_path(path, selector)),
            };
        }
        if layout::is_series_tag(ct) {
            if let Some(n) = layout::integer_value(selector) {
                return self.poke_at(container, n, value);
            }
        }
        Err(self.bad_path(path, selector))
    }

    /// Replace item `n` (1-based, relative to the index).
    pub(crate) fn poke_at(&mut self, series: &Cell, n: i64, value: Cell) -> Result<(), Escape> {
        let id = layout::series_id(series);
        let pos = relative_pos(layout::series_index(series), n).ok_or_else(errors::past_end)?;
        if layout::is_array_tag(layout::tag_of(series)) {
            let slot = self.heap.array_mut(id)?.get_mut(pos).ok_or_else(errors::past_end)?;
            *slot = value;
            return Ok(());
        }
        let c = layout::char_value(&value).ok_or_else(|| {
            errors::expect_arg("poke", "value", layout::datatype_of(&value).map_or("unset!", |d| d.name()))
        })?;
        let slot = self.heap.text_mut(id)?.get_mut(pos).ok_or_else(errors::past_end)?;
        *slot = c;
        Ok(())
    }

    fn bad_path(&self, path: &Cell, part: &Cell) -> Escape {
        let path = mold::mold(self.heap, path, false);
        let part = mold::mold(self.heap, part, false);
        errors::invalid_path(path, part).into()
    }
}

/// Absolute position of the 1-based offset `n` from `index`.
pub(crate) fn relative_pos(index: usize, n: i64) -> Option<usize> {
    if n < 1 {
        return None;
    }
    let offset = usize::try_from(n - 1).ok()?;
    index.checked_add(offset)
}
