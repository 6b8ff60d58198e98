//! Interpreter memory: series, frames and function nodes.
//!
//! Each kind of node lives in its own [`Arena`]; cells refer to nodes by
//! arena index. Nothing is freed except by [`Heap::collect`], which the host
//! triggers between top-level operations, so a cell obtained during an
//! evaluation stays valid until that evaluation returns.

mod bind;
mod gc;

pub(crate) use bind::BindMode;

use ren_cell::Cell;
use rustc_hash::FxHashMap;

use crate::errors::{self, Category, ErrorKind};
use crate::layout::{self, tag};
use crate::symbols::{Symbol, SymbolTable};

pub(crate) type SeriesId = u32;
pub(crate) type FrameId = u32;
pub(crate) type FuncId = u32;

/// Slots with a free list and a mark bit per slot.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    marks: Vec<bool>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Arena<T> {
    fn new() -> Self {
        Arena {
            slots: Vec::new(),
            marks: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    fn alloc(&mut self, value: T) -> u32 {
        self.live += 1;
        if let Some(id) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(id as usize) {
                *slot = Some(value);
                return id;
            }
        }
        let id = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Some(value));
        self.marks.push(false);
        id
    }

    pub(crate) fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(id as usize)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.slots.get_mut(id as usize)?.as_mut()
    }

    /// Mark a live slot. Returns true the first time it is marked.
    fn mark(&mut self, id: u32) -> bool {
        let i = id as usize;
        match (self.slots.get(i), self.marks.get_mut(i)) {
            (Some(Some(_)), Some(mark)) if !*mark => {
                *mark = true;
                true
            }
            _ => false,
        }
    }

    /// Free every unmarked slot and clear the marks. Returns the number freed.
    fn sweep(&mut self) -> usize {
        let mut freed = 0;
        for (i, (slot, mark)) in self.slots.iter_mut().zip(self.marks.iter_mut()).enumerate() {
            if slot.is_some() && !*mark {
                *slot = None;
                self.free.push(u32::try_from(i).unwrap_or(u32::MAX));
                freed += 1;
            }
            *mark = false;
        }
        self.live -= freed;
        freed
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }
}

#[derive(Clone, Debug)]
pub(crate) enum SeriesData {
    Array(Vec<Cell>),
    Text(Vec<char>),
}

impl SeriesData {
    pub(crate) fn len(&self) -> usize {
        match self {
            SeriesData::Array(items) => items.len(),
            SeriesData::Text(chars) => chars.len(),
        }
    }
}

/// A context: canonical keys, their values, and an optional parent that
/// binding falls back to.
#[derive(Clone, Debug, Default)]
pub(crate) struct Frame {
    keys: Vec<Symbol>,
    values: Vec<Cell>,
    index: FxHashMap<Symbol, usize>,
    pub(crate) parent: Option<FrameId>,
}

impl Frame {
    pub(crate) fn new(parent: Option<FrameId>) -> Self {
        Frame {
            parent,
            ..Frame::default()
        }
    }

    pub(crate) fn find(&self, canon: Symbol) -> Option<usize> {
        self.index.get(&canon).copied()
    }

    /// Add a key (or find the existing one). Returns its slot.
    pub(crate) fn add(&mut self, canon: Symbol, value: Cell) -> usize {
        if let Some(slot) = self.find(canon) {
            return slot;
        }
        let slot = self.keys.len();
        self.keys.push(canon);
        self.values.push(value);
        self.index.insert(canon, slot);
        slot
    }

    pub(crate) fn get(&self, slot: usize) -> Option<Cell> {
        self.values.get(slot).copied()
    }

    pub(crate) fn set(&mut self, slot: usize, value: Cell) -> bool {
        match self.values.get_mut(slot) {
            Some(v) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    pub(crate) fn keys(&self) -> &[Symbol] {
        &self.keys
    }

    pub(crate) fn values(&self) -> &[Cell] {
        &self.values
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParamClass {
    /// Evaluated argument.
    Normal,
    /// Taken literally from the call site.
    Quoted,
    /// Refinement flag; parameters after it belong to it.
    Refinement,
    /// Local variable, never filled from the call site.
    Local,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Param {
    pub(crate) symbol: Symbol,
    pub(crate) class: ParamClass,
}

/// A user function built by `func`.
#[derive(Clone, Debug)]
pub(crate) struct FuncNode {
    pub(crate) params: Vec<Param>,
    pub(crate) spec: Cell,
    pub(crate) body: Cell,
}

pub(crate) struct Heap {
    series: Arena<SeriesData>,
    frames: Arena<Frame>,
    funcs: Arena<FuncNode>,
    pub(crate) symbols: SymbolTable,
    pub(crate) lib: FrameId,
    pub(crate) user: FrameId,
    allocations: usize,
}

impl Heap {
    pub(crate) fn new() -> Self {
        let mut heap = Heap {
            series: Arena::new(),
            frames: Arena::new(),
            funcs: Arena::new(),
            symbols: SymbolTable::new(),
            lib: 0,
            user: 0,
            allocations: 0,
        };
        heap.lib = heap.alloc_frame(Frame::new(None));
        heap.user = heap.alloc_frame(Frame::new(Some(heap.lib)));
        heap
    }

    /// Nodes allocated since the last collection.
    pub(crate) fn allocations(&self) -> usize {
        self.allocations
    }

    /// Live nodes of every kind.
    pub(crate) fn live_nodes(&self) -> usize {
        self.series.live() + self.frames.live() + self.funcs.live()
    }

    // Allocation.

    pub(crate) fn alloc_array(&mut self, items: Vec<Cell>) -> SeriesId {
        self.allocations += 1;
        self.series.alloc(SeriesData::Array(items))
    }

    pub(crate) fn alloc_text(&mut self, chars: Vec<char>) -> SeriesId {
        self.allocations += 1;
        self.series.alloc(SeriesData::Text(chars))
    }

    pub(crate) fn alloc_frame(&mut self, frame: Frame) -> FrameId {
        self.allocations += 1;
        self.frames.alloc(frame)
    }

    pub(crate) fn alloc_func(&mut self, node: FuncNode) -> FuncId {
        self.allocations += 1;
        self.funcs.alloc(node)
    }

    pub(crate) fn make_array(&mut self, tag: u8, items: Vec<Cell>) -> Cell {
        let id = self.alloc_array(items);
        layout::series(tag, id, 0)
    }

    pub(crate) fn make_text(&mut self, tag: u8, text: &str) -> Cell {
        let id = self.alloc_text(text.chars().collect());
        layout::series(tag, id, 0)
    }

    pub(crate) fn make_word(&mut self, tag: u8, spelling: &str) -> Cell {
        let sym = self.symbols.intern(spelling);
        layout::word(tag, sym, None)
    }

    // Access.

    pub(crate) fn series(&self, id: SeriesId) -> Result<&SeriesData, ErrorKind> {
        self.series.get(id).ok_or_else(|| errors::stale("series"))
    }

    pub(crate) fn series_mut(&mut self, id: SeriesId) -> Result<&mut SeriesData, ErrorKind> {
        self.series.get_mut(id).ok_or_else(|| errors::stale("series"))
    }

    pub(crate) fn array(&self, id: SeriesId) -> Result<&Vec<Cell>, ErrorKind> {
        match self.series(id)? {
            SeriesData::Array(items) => Ok(items),
            SeriesData::Text(_) => Err(errors::stale("array")),
        }
    }

    pub(crate) fn array_mut(&mut self, id: SeriesId) -> Result<&mut Vec<Cell>, ErrorKind> {
        match self.series_mut(id)? {
            SeriesData::Array(items) => Ok(items),
            SeriesData::Text(_) => Err(errors::stale("array")),
        }
    }

    pub(crate) fn text(&self, id: SeriesId) -> Result<&Vec<char>, ErrorKind> {
        match self.series(id)? {
            SeriesData::Text(chars) => Ok(chars),
            SeriesData::Array(_) => Err(errors::stale("string")),
        }
    }

    pub(crate) fn text_mut(&mut self, id: SeriesId) -> Result<&mut Vec<char>, ErrorKind> {
        match self.series_mut(id)? {
            SeriesData::Text(chars) => Ok(chars),
            SeriesData::Array(_) => Err(errors::stale("string")),
        }
    }

    pub(crate) fn series_len(&self, id: SeriesId) -> Result<usize, ErrorKind> {
        Ok(self.series(id)?.len())
    }

    /// Item of an array at an absolute position.
    pub(crate) fn array_at(&self, id: SeriesId, pos: usize) -> Result<Option<Cell>, ErrorKind> {
        Ok(self.array(id)?.get(pos).copied())
    }

    /// Items of an array cell from its index to the tail.
    pub(crate) fn array_items(&self, cell: &Cell) -> Result<Vec<Cell>, ErrorKind> {
        let items = self.array(layout::series_id(cell))?;
        let index = layout::series_index(cell).min(items.len());
        Ok(items.get(index..).map(<[Cell]>::to_vec).unwrap_or_default())
    }

    /// Text of a string cell from its index to the tail.
    pub(crate) fn text_string(&self, cell: &Cell) -> Result<String, ErrorKind> {
        let chars = self.text(layout::series_id(cell))?;
        let index = layout::series_index(cell).min(chars.len());
        Ok(chars.get(index..).unwrap_or_default().iter().collect())
    }

    pub(crate) fn frame(&self, id: FrameId) -> Result<&Frame, ErrorKind> {
        self.frames.get(id).ok_or_else(|| errors::stale("context"))
    }

    pub(crate) fn frame_mut(&mut self, id: FrameId) -> Result<&mut Frame, ErrorKind> {
        self.frames.get_mut(id).ok_or_else(|| errors::stale("context"))
    }

    pub(crate) fn func(&self, id: FuncId) -> Result<&FuncNode, ErrorKind> {
        self.funcs.get(id).ok_or_else(|| errors::stale("function"))
    }

    pub(crate) fn name(&self, word: &Cell) -> &str {
        self.symbols.name(layout::word_symbol(word))
    }

    // Variables.

    /// Value a word is bound to.
    pub(crate) fn get_var(&self, word: &Cell) -> Result<Cell, ErrorKind> {
        let (frame, slot) =
            layout::word_binding(word).ok_or_else(|| errors::not_bound(self.name(word)))?;
        self.frame(frame)?
            .get(slot)
            .ok_or_else(|| errors::not_bound(self.name(word)))
    }

    pub(crate) fn set_var(&mut self, word: &Cell, value: Cell) -> Result<(), ErrorKind> {
        let (frame, slot) =
            layout::word_binding(word).ok_or_else(|| errors::not_bound(self.name(word)))?;
        if self.frame_mut(frame)?.set(slot, value) {
            Ok(())
        } else {
            Err(errors::not_bound(self.name(word)))
        }
    }

    /// Look a key up in a frame and its parents.
    pub(crate) fn frame_lookup(&self, frame: FrameId, key: &str) -> Result<Option<Cell>, ErrorKind> {
        let Some(canon) = self.symbols.find_canon(key) else {
            return Ok(None);
        };
        let mut current = Some(frame);
        while let Some(id) = current {
            let f = self.frame(id)?;
            if let Some(slot) = f.find(canon) {
                return Ok(f.get(slot));
            }
            current = f.parent;
        }
        Ok(None)
    }

    /// Set (adding if missing) a key directly in `frame`.
    pub(crate) fn frame_set(&mut self, frame: FrameId, key: &str, value: Cell) -> Result<(), ErrorKind> {
        let sym = self.symbols.intern(key);
        let canon = self.symbols.canon(sym);
        let f = self.frame_mut(frame)?;
        let slot = f.add(canon, value);
        f.set(slot, value);
        Ok(())
    }

    /// Field of a frame itself (no parents), by name.
    pub(crate) fn field(&self, frame: FrameId, key: &str) -> Option<Cell> {
        let canon = self.symbols.find_canon(key)?;
        let f = self.frames.get(frame)?;
        f.find(canon).and_then(|slot| f.get(slot))
    }

    // Errors.

    /// Build an `error!` value for an error kind.
    pub(crate) fn make_error(&mut self, kind: &ErrorKind) -> Cell {
        self.make_error_fields(kind.category(), kind.id(), &kind.to_string(), kind.code())
    }

    pub(crate) fn make_error_fields(
        &mut self,
        category: Category,
        id: &str,
        message: &str,
        code: i64,
    ) -> Cell {
        let type_word = self.make_word(tag::WORD, category.word());
        let id_word = self.make_word(tag::WORD, id);
        let message = self.make_text(tag::STRING, message);
        let fields = [
            ("code", layout::integer(code)),
            ("type", type_word),
            ("id", id_word),
            ("message", message),
            ("near", layout::none()),
            ("where", layout::none()),
            ("arg1", layout::none()),
            ("arg2", layout::none()),
            ("arg3", layout::none()),
        ];
        let mut frame = Frame::new(None);
        for (key, value) in fields {
            let sym = self.symbols.intern(key);
            frame.add(self.symbols.canon(sym), value);
        }
        let id = self.alloc_frame(frame);
        layout::context(tag::ERROR, id)
    }

    /// `** Script error: x has no value`
    pub(crate) fn error_text(&self, error: &Cell) -> String {
        let frame = layout::frame_id(error);
        let category = self
            .field(frame, "type")
            .filter(|c| layout::is_word_tag(layout::tag_of(c)))
            .map_or(Category::User, |c| Category::from_word(self.name(&c)));
        let message = self
            .field(frame, "message")
            .filter(|c| layout::is_string_tag(layout::tag_of(c)))
            .and_then(|c| self.text_string(&c).ok())
            .unwrap_or_default();
        format!("** {} error: {message}", category.title())
    }

    // Copying.

    /// Copy a series from its index. With `deep`, nested series are copied
    /// too (each only once, so cycles stay cycles).
    pub(crate) fn copy_series(&mut self, cell: &Cell, deep: bool) -> Result<Cell, ErrorKind> {
        let tag = layout::tag_of(cell);
        let id = layout::series_id(cell);
        let index = layout::series_index(cell);
        let data = match self.series(id)? {
            SeriesData::Array(items) => {
                SeriesData::Array(items.get(index.min(items.len())..).unwrap_or_default().to_vec())
            }
            SeriesData::Text(chars) => {
                SeriesData::Text(chars.get(index.min(chars.len())..).unwrap_or_default().to_vec())
            }
        };
        let is_array = matches!(data, SeriesData::Array(_));
        self.allocations += 1;
        let new_id = self.series.alloc(data);
        if deep && is_array {
            let mut copied = FxHashMap::default();
            if index == 0 {
                copied.insert(id, new_id);
            }
            self.copy_children(new_id, &mut copied)?;
        }
        Ok(layout::series(tag, new_id, 0))
    }

    fn copy_children(
        &mut self,
        root: SeriesId,
        copied: &mut FxHashMap<SeriesId, SeriesId>,
    ) -> Result<(), ErrorKind> {
        let mut work = vec![root];
        while let Some(sid) = work.pop() {
            let len = self.series_len(sid)?;
            for i in 0..len {
                let Some(item) = self.array_at(sid, i)? else {
                    continue;
                };
                if !layout::is_series_tag(layout::tag_of(&item)) {
                    continue;
                }
                let src = layout::series_id(&item);
                let dst = if let Some(&dst) = copied.get(&src) {
                    dst
                } else {
                    let data = self.series(src)?.clone();
                    let is_array = matches!(data, SeriesData::Array(_));
                    self.allocations += 1;
                    let dst = self.series.alloc(data);
                    copied.insert(src, dst);
                    if is_array {
                        work.push(dst);
                    }
                    dst
                };
                if let Some(slot) = self.array_mut(sid)?.get_mut(i) {
                    *slot = layout::series(layout::tag_of(&item), dst, layout::series_index(&item));
                }
            }
        }
        Ok(())
    }

    /// Shallow copy of a context's frame.
    pub(crate) fn copy_frame(&mut self, cell: &Cell) -> Result<Cell, ErrorKind> {
        let frame = self.frame(layout::frame_id(cell))?.clone();
        let id = self.alloc_frame(frame);
        Ok(layout::context(layout::tag_of(cell), id))
    }
}
