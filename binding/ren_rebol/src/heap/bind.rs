//! Binding words to frames.

use ren_cell::Cell;
use rustc_hash::FxHashSet;

use super::{FrameId, Heap, SeriesId};
use crate::errors::ErrorKind;
use crate::layout::{self, tag};
use crate::symbols::Symbol;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BindMode {
    /// Bind to the nearest frame in the target's parent chain that has the
    /// key, adding the key to the target when none does.
    AddMissing,
    /// Bind only words that are keys of the target itself.
    ExistingOnly,
}

impl Heap {
    /// Bind every word in `cells` and, recursively, in the arrays they hold.
    pub(crate) fn bind_deep(
        &mut self,
        cells: &mut [Cell],
        target: FrameId,
        mode: BindMode,
    ) -> Result<(), ErrorKind> {
        let mut work = Vec::new();
        for cell in cells.iter_mut() {
            self.bind_one(cell, target, mode, &mut work)?;
        }
        let mut visited = FxHashSet::default();
        while let Some(sid) = work.pop() {
            if !visited.insert(sid) {
                continue;
            }
            let len = self.series_len(sid)?;
            for i in 0..len {
                let Some(mut item) = self.array_at(sid, i)? else {
                    continue;
                };
                let before = item;
                self.bind_one(&mut item, target, mode, &mut work)?;
                if item != before {
                    if let Some(slot) = self.array_mut(sid)?.get_mut(i) {
                        *slot = item;
                    }
                }
            }
        }
        Ok(())
    }

    /// Bind the contents of one array cell.
    pub(crate) fn bind_array(
        &mut self,
        array: &Cell,
        target: FrameId,
        mode: BindMode,
    ) -> Result<(), ErrorKind> {
        let mut cells = [*array];
        self.bind_deep(&mut cells, target, mode)
    }

    fn bind_one(
        &mut self,
        cell: &mut Cell,
        target: FrameId,
        mode: BindMode,
        work: &mut Vec<SeriesId>,
    ) -> Result<(), ErrorKind> {
        let t = layout::tag_of(cell);
        if layout::is_array_tag(t) {
            work.push(layout::series_id(cell));
        } else if layout::is_word_tag(t) && t != tag::REFINEMENT && t != tag::ISSUE {
            if let Some(bound) = self.bind_word(cell, target, mode)? {
                *cell = bound;
            }
        }
        Ok(())
    }

    /// The word rebound according to `mode`, or `None` to leave it as is.
    pub(crate) fn bind_word(
        &mut self,
        word: &Cell,
        target: FrameId,
        mode: BindMode,
    ) -> Result<Option<Cell>, ErrorKind> {
        let canon = self.symbols.canon(layout::word_symbol(word));
        match mode {
            BindMode::ExistingOnly => Ok(self
                .frame(target)?
                .find(canon)
                .map(|slot| layout::rebind(word, Some((target, slot))))),
            BindMode::AddMissing => {
                let mut current = Some(target);
                while let Some(id) = current {
                    let frame = self.frame(id)?;
                    if let Some(slot) = frame.find(canon) {
                        return Ok(Some(layout::rebind(word, Some((id, slot)))));
                    }
                    current = frame.parent;
                }
                let slot = self.frame_mut(target)?.add(canon, layout::unset());
                Ok(Some(layout::rebind(word, Some((target, slot)))))
            }
        }
    }

    /// Canonical symbols of the top-level set-words in `items`, in order and
    /// without duplicates.
    pub(crate) fn collect_set_words(&self, items: &[Cell]) -> Vec<Symbol> {
        let mut seen = FxHashSet::default();
        items
            .iter()
            .filter(|c| layout::tag_of(c) == tag::SET_WORD)
            .map(|c| self.symbols.canon(layout::word_symbol(c)))
            .filter(|sym| seen.insert(*sym))
            .collect()
    }
}
