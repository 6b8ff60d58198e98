//! Mark and sweep collection.
//!
//! Roots are the `lib` and `user` frames plus whatever cells the caller
//! supplies (the host's live-set). Marking uses an explicit work list, so
//! deeply nested or cyclic data cannot overflow the stack.

use ren_cell::Cell;

use super::{FrameId, Heap, SeriesData};
use crate::layout::{self, tag};

impl Heap {
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn collect(&mut self, roots: &mut dyn Iterator<Item = Cell>) -> usize {
        let mut work: Vec<Cell> = roots.collect();
        let host_roots = work.len();
        work.push(layout::context(tag::OBJECT, self.lib));
        work.push(layout::context(tag::OBJECT, self.user));

        while let Some(cell) = work.pop() {
            self.mark_cell(&cell, &mut work);
        }

        let freed = self.series.sweep() + self.frames.sweep() + self.funcs.sweep();
        self.allocations = 0;
        tracing::debug!(host_roots, freed, live = self.live_nodes(), "collected");
        freed
    }

    fn mark_cell(&mut self, cell: &Cell, work: &mut Vec<Cell>) {
        let t = layout::tag_of(cell);
        if layout::is_series_tag(t) {
            let id = layout::series_id(cell);
            if self.series.mark(id) {
                if let Some(SeriesData::Array(items)) = self.series.get(id) {
                    work.extend_from_slice(items);
                }
            }
        } else if layout::is_word_tag(t) {
            if let Some((frame, _)) = layout::word_binding(cell) {
                self.mark_frame(frame, work);
            }
        } else if layout::is_context_tag(t) {
            self.mark_frame(layout::frame_id(cell), work);
        } else if t == tag::FUNCTION {
            let id = layout::func_id(cell);
            if self.funcs.mark(id) {
                if let Some(node) = self.funcs.get(id) {
                    work.push(node.spec);
                    work.push(node.body);
                }
            }
        }
    }

    fn mark_frame(&mut self, id: FrameId, work: &mut Vec<Cell>) {
        if !self.frames.mark(id) {
            return;
        }
        if let Some(frame) = self.frames.get(id) {
            work.extend_from_slice(frame.values());
            if let Some(parent) = frame.parent {
                work.push(layout::context(tag::OBJECT, parent));
            }
        }
    }
}
