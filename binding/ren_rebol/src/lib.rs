//! Rebol-flavored interpreter backend for the Ren binding.
//!
//! [`RebolRuntime`] implements [`ren_cell::Runtime`] over a small
//! interpreter: a scanner for source text, a garbage-collected heap of
//! series, frames and functions, and a block evaluator with a native
//! library plus a bootstrap layer written in the language itself.
//!
//! Values are [`Cell`]s laid out as described in `layout`. Collection only
//! happens when the host asks for it, between top-level operations, so no
//! cell is ever freed while an evaluation holds it.

mod compare;
mod errors;
mod eval;
mod heap;
mod layout;
mod mezz;
mod mold;
mod natives;
mod scan;
mod stack;
mod symbols;

use std::cell::{RefCell, RefMut};

use ren_cell::{CancelFlag, Cell, Datatype, EngineConfig, Failure, Loaded, Runtime, RuntimeResult};

use crate::eval::{Escape, Interp};
use crate::heap::{BindMode, FrameId, Heap};
use crate::layout::tag;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Fresh,
    Ready,
    ShutDown,
}

/// The Rebol backend. One per engine, used from one thread.
pub struct RebolRuntime {
    heap: RefCell<Heap>,
    config: EngineConfig,
    cancel: CancelFlag,
    state: std::cell::Cell<State>,
}

impl std::fmt::Debug for RebolRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RebolRuntime")
            .field("state", &self.state.get())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RebolRuntime {
    /// The heap, once the interpreter is up.
    fn heap(&self) -> RuntimeResult<RefMut<'_, Heap>> {
        if self.state.get() != State::Ready {
            self.lazy_initialize()?;
        }
        self.heap
            .try_borrow_mut()
            .map_err(|_| Failure::fatal("Reentrancy", "backend called during its own evaluation"))
    }

    /// Frame of a context cell, or `default` when none was given.
    fn frame_of(context: Option<&Cell>, default: FrameId) -> RuntimeResult<FrameId> {
        match context {
            None => Ok(default),
            Some(cell) if layout::is_context_tag(layout::tag_of(cell)) => Ok(layout::frame_id(cell)),
            Some(_) => Err(Failure::usage("context must be an object")),
        }
    }

    /// Cells for loadable items. Source text is scanned and bound into
    /// `target`; its items are spliced.
    fn load_items(heap: &mut Heap, items: &[Loaded], target: FrameId) -> RuntimeResult<Vec<Cell>> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Loaded::Cell(cell) => out.push(*cell),
                Loaded::Source(text) => {
                    let mut cells = scan::scan(heap, text).map_err(|kind| raise(heap, &kind))?;
                    heap.bind_deep(&mut cells, target, BindMode::AddMissing)
                        .map_err(|kind| raise(heap, &kind))?;
                    out.extend(cells);
                }
            }
        }
        Ok(out)
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn boot(&self, heap: &mut Heap) -> RuntimeResult<()> {
        if std::mem::size_of::<Cell>() != 16 {
            return Err(Failure::fatal("Cell size", "cells must be 128 bits"));
        }
        let lib = heap.lib;
        let set = |heap: &mut Heap, key: &str, value: Cell| {
            heap.frame_set(lib, key, value)
                .map_err(|kind| Failure::fatal("Boot", kind.to_string()))
        };

        for (index, def) in natives::NATIVES.iter().enumerate() {
            set(heap, def.name, layout::native(index))?;
        }
        for (key, value) in [
            ("true", true),
            ("false", false),
            ("on", true),
            ("off", false),
            ("yes", true),
            ("no", false),
        ] {
            set(heap, key, layout::logic(value))?;
        }
        set(heap, "none", layout::none())?;
        for datatype in Datatype::ALL {
            let word = heap.make_word(tag::WORD, datatype.name());
            set(heap, datatype.name(), word)?;
        }

        let system = self.system_object(heap);
        set(heap, "system", system)?;

        let quit = heap.field(lib, "quit");
        if !quit.is_some_and(|c| layout::tag_of(&c) == tag::NATIVE) {
            return Err(Failure::fatal("Natives", "quit is not a native"));
        }

        self.run_mezzanine(heap)
            .map_err(|content| Failure::fatal("Mezzanine", content))
    }

    /// `system/options/home` and `system/options/quiet`.
    fn system_object(&self, heap: &mut Heap) -> Cell {
        let home = match &self.config.home_dir {
            Some(dir) => heap.make_text(tag::FILE, &dir.to_string_lossy()),
            None => layout::none(),
        };
        let mut options = heap::Frame::new(None);
        for (key, value) in [("home", home), ("quiet", layout::logic(self.config.quiet))] {
            let sym = heap.symbols.intern(key);
            options.add(heap.symbols.canon(sym), value);
        }
        let options = layout::context(tag::OBJECT, heap.alloc_frame(options));

        let mut system = heap::Frame::new(None);
        for (key, value) in [("options", options), ("product", heap.make_word(tag::WORD, "ren"))] {
            let sym = heap.symbols.intern(key);
            system.add(heap.symbols.canon(sym), value);
        }
        layout::context(tag::OBJECT, heap.alloc_frame(system))
    }

    fn run_mezzanine(&self, heap: &mut Heap) -> Result<(), String> {
        let lib = heap.lib;
        let mut items = scan::scan(heap, mezz::MEZZANINE).map_err(|kind| kind.to_string())?;
        for key in heap.collect_set_words(&items) {
            heap.frame_mut(lib)
                .map_err(|kind| kind.to_string())?
                .add(key, layout::unset());
        }
        heap.bind_deep(&mut items, lib, BindMode::ExistingOnly)
            .map_err(|kind| kind.to_string())?;
        let block = heap.make_array(tag::BLOCK, items);
        let mut interp = Interp::new(heap, &self.config, &self.cancel);
        match interp.do_array(&block) {
            Ok(_) => Ok(()),
            Err(escape) => {
                let escape = interp.materialize(escape);
                Err(match escape {
                    Escape::Error(error) => heap.error_text(&error),
                    other => format!("{other:?}"),
                })
            }
        }
    }

    fn series_cell(cell: &Cell) -> RuntimeResult<()> {
        if layout::is_series_tag(layout::tag_of(cell)) {
            Ok(())
        } else {
            Err(Failure::usage("not a series"))
        }
    }
}

/// An interpreter error as a failure carrying an `error!` value.
#[cold]
fn raise(heap: &mut Heap, kind: &errors::ErrorKind) -> Failure {
    Failure::Error {
        error: heap.make_error(kind),
    }
}

/// How an escape that reached the top of an evaluation is reported.
fn escape_to_result(heap: &mut Heap, escape: Escape) -> RuntimeResult<Option<Cell>> {
    match escape {
        Escape::Raise(kind) => Err(raise(heap, &kind)),
        Escape::Error(error) => Err(Failure::Error { error }),
        Escape::Throw { value, name } => Err(Failure::Throw {
            value: (!layout::is_unset(&value)).then_some(value),
            name,
        }),
        Escape::Return(_) => Err(raise(heap, &errors::not_in_function())),
        Escape::Break(_) => Err(raise(heap, &errors::no_loop())),
        Escape::Halt => Err(Failure::Halted),
    }
}

impl Runtime for RebolRuntime {
    const NAME: &'static str = "rebol";

    fn new(config: EngineConfig) -> Self {
        RebolRuntime {
            heap: RefCell::new(Heap::new()),
            config,
            cancel: CancelFlag::new(),
            state: std::cell::Cell::new(State::Fresh),
        }
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn lazy_initialize(&self) -> RuntimeResult<bool> {
        match self.state.get() {
            State::Ready => return Ok(false),
            State::ShutDown => {
                return Err(Failure::fatal("Shutdown", "the interpreter was shut down"));
            }
            State::Fresh => {}
        }
        let mut heap = self
            .heap
            .try_borrow_mut()
            .map_err(|_| Failure::fatal("Reentrancy", "initialization during evaluation"))?;
        self.boot(&mut heap)?;
        self.state.set(State::Ready);
        tracing::debug!(
            live = heap.live_nodes(),
            symbols = heap.symbols.len(),
            "rebol backend initialized"
        );
        Ok(true)
    }

    fn is_initialized(&self) -> bool {
        self.state.get() == State::Ready
    }

    fn classify(cell: &Cell) -> Option<Datatype> {
        layout::datatype_of(cell)
    }

    fn stamp(cell: &mut Cell, datatype: Datatype) {
        layout::set_tag(cell, layout::tag_of_datatype(datatype));
    }

    fn needs_refcount(cell: &Cell) -> bool {
        let t = layout::tag_of(cell);
        layout::is_series_tag(t)
            || layout::is_context_tag(t)
            || t == tag::FUNCTION
            || (layout::is_word_tag(t) && layout::word_binding(cell).is_some())
    }

    fn series_index(cell: &Cell) -> usize {
        layout::series_index(cell)
    }

    fn set_series_index(cell: &mut Cell, index: usize) {
        *cell = layout::with_index(cell, index);
    }

    fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    fn make_unset() -> Cell {
        layout::unset()
    }

    fn make_none() -> Cell {
        layout::none()
    }

    fn make_logic(value: bool) -> Cell {
        layout::logic(value)
    }

    fn make_integer(value: i64) -> Cell {
        layout::integer(value)
    }

    fn make_float(value: f64) -> Cell {
        layout::decimal(value)
    }

    fn make_character(value: char) -> Cell {
        layout::character(value)
    }

    fn logic_of(cell: &Cell) -> Option<bool> {
        layout::logic_value(cell)
    }

    fn integer_of(cell: &Cell) -> Option<i64> {
        layout::integer_value(cell)
    }

    fn float_of(cell: &Cell) -> Option<f64> {
        layout::decimal_value(cell)
    }

    fn character_of(cell: &Cell) -> Option<char> {
        layout::char_value(cell)
    }

    fn make_word(&self, kind: Datatype, spelling: &str, context: Option<&Cell>) -> RuntimeResult<Cell> {
        if !kind.is_any_word() {
            return Err(Failure::usage(format!("{kind} is not a word type")));
        }
        let mut heap = self.heap()?;
        let word = heap.make_word(layout::tag_of_datatype(kind), spelling);
        let Some(context) = context else {
            return Ok(word);
        };
        let frame = Self::frame_of(Some(context), heap.user)?;
        match heap.bind_word(&word, frame, BindMode::AddMissing) {
            Ok(bound) => Ok(bound.unwrap_or(word)),
            Err(kind) => Err(raise(&mut heap, &kind)),
        }
    }

    fn make_string(&self, kind: Datatype, text: &str) -> RuntimeResult<Cell> {
        if !kind.is_any_string() {
            return Err(Failure::usage(format!("{kind} is not a string type")));
        }
        Ok(self.heap()?.make_text(layout::tag_of_datatype(kind), text))
    }

    fn make_array(&self, kind: Datatype, items: &[Loaded], context: Option<&Cell>) -> RuntimeResult<Cell> {
        if !kind.is_any_array() {
            return Err(Failure::usage(format!("{kind} is not an array type")));
        }
        let mut heap = self.heap()?;
        let frame = Self::frame_of(context, heap.user)?;
        let cells = Self::load_items(&mut heap, items, frame)?;
        Ok(heap.make_array(layout::tag_of_datatype(kind), cells))
    }

    fn spelling_of(&self, cell: &Cell) -> RuntimeResult<String> {
        let heap = self.heap()?;
        let t = layout::tag_of(cell);
        if layout::is_word_tag(t) {
            return Ok(heap.name(cell).to_owned());
        }
        if layout::is_string_tag(t) {
            return heap
                .text_string(&layout::with_index(cell, 0))
                .map_err(|kind| Failure::usage(kind.to_string()));
        }
        Err(Failure::usage("not a word or string"))
    }

    fn make_context(&self, parent: Option<&Cell>) -> RuntimeResult<Cell> {
        let mut heap = self.heap()?;
        let parent = parent.map(|p| Self::frame_of(Some(p), heap.user)).transpose()?;
        let frame = heap.alloc_frame(heap::Frame::new(parent));
        Ok(layout::context(tag::OBJECT, frame))
    }

    fn user_context(&self) -> RuntimeResult<Cell> {
        Ok(layout::context(tag::OBJECT, self.heap()?.user))
    }

    fn lib_context(&self) -> RuntimeResult<Cell> {
        Ok(layout::context(tag::OBJECT, self.heap()?.lib))
    }

    fn context_get(&self, context: &Cell, key: &str) -> RuntimeResult<Option<Cell>> {
        let mut heap = self.heap()?;
        let frame = Self::frame_of(Some(context), heap.user)?;
        match heap.frame_lookup(frame, key) {
            Ok(value) => Ok(value.filter(|v| !layout::is_unset(v))),
            Err(kind) => Err(raise(&mut heap, &kind)),
        }
    }

    fn context_set(&self, context: &Cell, key: &str, value: &Cell) -> RuntimeResult<()> {
        let mut heap = self.heap()?;
        let frame = Self::frame_of(Some(context), heap.user)?;
        heap.frame_set(frame, key, *value)
            .map_err(|kind| raise(&mut heap, &kind))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(args = args.len()))]
    fn apply(
        &self,
        applicand: Option<&Cell>,
        args: &[Loaded],
        context: Option<&Cell>,
    ) -> RuntimeResult<Option<Cell>> {
        let mut heap = self.heap()?;
        let frame = Self::frame_of(context, heap.user)?;
        let mut cells = Self::load_items(&mut heap, args, frame)?;

        let block = match applicand {
            Some(a) if cells.is_empty() && matches!(layout::tag_of(a), tag::BLOCK | tag::PAREN) => {
                if context.is_some() {
                    heap.bind_array(a, frame, BindMode::AddMissing)
                        .map_err(|kind| raise(&mut heap, &kind))?;
                }
                *a
            }
            Some(a) => {
                cells.insert(0, *a);
                heap.make_array(tag::BLOCK, cells)
            }
            None => heap.make_array(tag::BLOCK, cells),
        };

        let outcome = Interp::new(&mut heap, &self.config, &self.cancel).do_array(&block);
        // A request that arrived after the last step must not leak into the
        // next evaluation.
        self.cancel.clear();
        match outcome {
            Ok(value) => Ok((!layout::is_unset(&value)).then_some(value)),
            Err(escape) => escape_to_result(&mut heap, escape),
        }
    }

    fn form(&self, cell: &Cell) -> RuntimeResult<String> {
        let heap = self.heap()?;
        Ok(mold::form(&heap, cell))
    }

    fn mold(&self, cell: &Cell, all: bool) -> RuntimeResult<String> {
        let heap = self.heap()?;
        Ok(mold::mold(&heap, cell, all))
    }

    fn is_equal(&self, a: &Cell, b: &Cell) -> RuntimeResult<bool> {
        let heap = self.heap()?;
        Ok(compare::equal(&heap, a, b, false))
    }

    fn copy(&self, cell: &Cell, deep: bool) -> RuntimeResult<Cell> {
        let mut heap = self.heap()?;
        let t = layout::tag_of(cell);
        let copied = if layout::is_series_tag(t) {
            heap.copy_series(cell, deep)
        } else if layout::is_context_tag(t) {
            heap.copy_frame(cell)
        } else {
            Ok(*cell)
        };
        copied.map_err(|kind| raise(&mut heap, &kind))
    }

    fn series_tail(&self, cell: &Cell) -> RuntimeResult<usize> {
        Self::series_cell(cell)?;
        let mut heap = self.heap()?;
        heap.series_len(layout::series_id(cell))
            .map_err(|kind| raise(&mut heap, &kind))
    }

    fn series_pick(&self, cell: &Cell, pos: usize) -> RuntimeResult<Option<Cell>> {
        Self::series_cell(cell)?;
        let mut heap = self.heap()?;
        let id = layout::series_id(cell);
        let picked = if layout::is_array_tag(layout::tag_of(cell)) {
            heap.array_at(id, pos)
        } else {
            heap.text(id).map(|chars| chars.get(pos).copied().map(layout::character))
        };
        picked.map_err(|kind| raise(&mut heap, &kind))
    }

    fn gc_pending(&self) -> bool {
        self.heap
            .try_borrow()
            .is_ok_and(|heap| heap.allocations() >= self.config.gc_threshold)
    }

    fn collect_garbage(&self, roots: &mut dyn Iterator<Item = Cell>) -> usize {
        if self.state.get() != State::Ready {
            return 0;
        }
        match self.heap.try_borrow_mut() {
            Ok(mut heap) => heap.collect(roots),
            Err(_) => 0,
        }
    }

    fn shutdown(&self) {
        if self.state.get() == State::ShutDown {
            return;
        }
        self.state.set(State::ShutDown);
        if let Ok(mut heap) = self.heap.try_borrow_mut() {
            *heap = Heap::new();
        }
        tracing::debug!("rebol backend shut down");
    }
}

#[cfg(test)]
mod tests;
