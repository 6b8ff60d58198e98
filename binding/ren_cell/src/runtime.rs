//! The contract every interpreter backend implements.
//!
//! Functions that only look at cell bits are associated functions (no
//! `self`): a cell's layout is fixed per backend, so classification,
//! stamping and immediate construction never need the interpreter state.
//! Everything that touches the heap, the symbol table or the evaluator takes
//! `&self`.
//!
//! A backend is selected at build time. The host binding is generic over
//! `Runtime` internally but only ever instantiates one implementation.

use crate::{CancelFlag, Cell, Datatype, EngineConfig, RuntimeResult};

/// One element handed to array construction or apply.
///
/// Host-side brace groups are already resolved into array cells by the time
/// they reach the backend.
#[derive(Clone, Debug, PartialEq)]
pub enum Loaded {
    /// A finished cell, spliced as a single item.
    Cell(Cell),
    /// Source text, scanned and bound; every item it yields is spliced.
    Source(String),
}

impl From<Cell> for Loaded {
    fn from(cell: Cell) -> Self {
        Loaded::Cell(cell)
    }
}

impl From<&str> for Loaded {
    fn from(text: &str) -> Self {
        Loaded::Source(text.to_owned())
    }
}

pub trait Runtime: Sized + 'static {
    /// Short backend name used in diagnostics ("rebol", "red").
    const NAME: &'static str;

    fn new(config: EngineConfig) -> Self;

    fn config(&self) -> &EngineConfig;

    /// Bring the interpreter up. Returns `Ok(true)` only on the call that did
    /// the work; later calls are no-ops returning `Ok(false)`.
    fn lazy_initialize(&self) -> RuntimeResult<bool>;

    fn is_initialized(&self) -> bool;

    // Type dispatch.

    /// The datatype of a cell, or `None` if the bits are not a valid value.
    fn classify(cell: &Cell) -> Option<Datatype>;

    /// Overwrite the type tag of `cell`, keeping its other fields.
    fn stamp(cell: &mut Cell, datatype: Datatype);

    fn datatype_name(datatype: Datatype) -> &'static str {
        datatype.name()
    }

    /// Whether the cell refers to collectable backend memory.
    fn needs_refcount(cell: &Cell) -> bool;

    /// 0-based position of a series cell.
    fn series_index(cell: &Cell) -> usize;

    fn set_series_index(cell: &mut Cell, index: usize);

    // Cancellation.

    fn cancel_flag(&self) -> CancelFlag;

    fn cancel(&self) {
        self.cancel_flag().raise();
    }

    // Immediates.

    fn make_unset() -> Cell;
    fn make_none() -> Cell;
    fn make_logic(value: bool) -> Cell;
    fn make_integer(value: i64) -> Cell;
    fn make_float(value: f64) -> Cell;
    fn make_character(value: char) -> Cell;

    fn logic_of(cell: &Cell) -> Option<bool>;
    fn integer_of(cell: &Cell) -> Option<i64>;
    fn float_of(cell: &Cell) -> Option<f64>;
    fn character_of(cell: &Cell) -> Option<char>;

    // Heap-backed construction.

    /// A word of the given word kind. When `context` is given the word is
    /// bound there, adding the key if missing.
    fn make_word(&self, kind: Datatype, spelling: &str, context: Option<&Cell>)
        -> RuntimeResult<Cell>;

    fn make_string(&self, kind: Datatype, text: &str) -> RuntimeResult<Cell>;

    /// An array of the given array kind, bound into `context` (user context
    /// when `None`).
    fn make_array(&self, kind: Datatype, items: &[Loaded], context: Option<&Cell>)
        -> RuntimeResult<Cell>;

    /// Spelling of a word or text of a string.
    fn spelling_of(&self, cell: &Cell) -> RuntimeResult<String>;

    // Contexts.

    fn make_context(&self, parent: Option<&Cell>) -> RuntimeResult<Cell>;
    fn user_context(&self) -> RuntimeResult<Cell>;
    fn lib_context(&self) -> RuntimeResult<Cell>;
    fn context_get(&self, context: &Cell, key: &str) -> RuntimeResult<Option<Cell>>;
    fn context_set(&self, context: &Cell, key: &str, value: &Cell) -> RuntimeResult<()>;

    // Evaluation.

    /// Evaluate `[applicand args...]` in `context` (user context when
    /// `None`). `Ok(None)` means the evaluation produced no value.
    fn apply(
        &self,
        applicand: Option<&Cell>,
        args: &[Loaded],
        context: Option<&Cell>,
    ) -> RuntimeResult<Option<Cell>>;

    // Inspection.

    fn form(&self, cell: &Cell) -> RuntimeResult<String>;
    fn mold(&self, cell: &Cell, all: bool) -> RuntimeResult<String>;
    fn is_equal(&self, a: &Cell, b: &Cell) -> RuntimeResult<bool>;

    fn is_same(&self, a: &Cell, b: &Cell) -> bool {
        a == b
    }

    fn copy(&self, cell: &Cell, deep: bool) -> RuntimeResult<Cell>;

    // Series.

    /// Number of items in the underlying series, ignoring the cell's index.
    fn series_tail(&self, cell: &Cell) -> RuntimeResult<usize>;

    /// Item at 0-based absolute position `pos`, `None` past the tail.
    fn series_pick(&self, cell: &Cell, pos: usize) -> RuntimeResult<Option<Cell>>;

    // Memory.

    /// Whether enough has been allocated since the last collection that the
    /// host should run one before its next top-level operation.
    fn gc_pending(&self) -> bool;

    /// Collect everything not reachable from the backend's own contexts or
    /// from `roots`. Returns how many nodes were freed.
    fn collect_garbage(&self, roots: &mut dyn Iterator<Item = Cell>) -> usize;

    /// Release interpreter resources. Later calls fail with a fatal error.
    fn shutdown(&self);
}
