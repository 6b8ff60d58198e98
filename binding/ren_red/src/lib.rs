//! Red-flavored backend.
//!
//! Cells use Red's layout: the header is the bare type id from [`TypeId`],
//! `extra` is the series index and `payload` holds the scalar bits or a
//! symbol id. Scalars and unbound words work. Everything that needs the Red
//! heap (strings, arrays, contexts, apply, iteration) reports
//! [`Failure::NotImplemented`].

mod symbols;
mod types;

use std::cell::RefCell;
use std::fmt;

use ren_cell::{
    CancelFlag, Cell, Datatype, EngineConfig, Failure, Loaded, Runtime, RuntimeResult,
};

use crate::symbols::Symbols;
pub use crate::types::TypeId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Fresh,
    Ready,
    ShutDown,
}

pub struct RedRuntime {
    symbols: RefCell<Symbols>,
    config: EngineConfig,
    cancel: CancelFlag,
    state: std::cell::Cell<State>,
}

impl fmt::Debug for RedRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedRuntime")
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

#[cold]
fn coming_soon(feature: &'static str) -> Failure {
    tracing::warn!(feature, "red backend operation not implemented");
    Failure::not_implemented(feature)
}

fn type_of(cell: &Cell) -> Option<TypeId> {
    TypeId::from_header(cell.header())
}

fn scalar(id: TypeId, payload: u64) -> Cell {
    Cell::new(id.header(), 0, payload)
}

impl RedRuntime {
    fn ready(&self) -> RuntimeResult<()> {
        if self.state.get() != State::Ready {
            self.lazy_initialize()?;
        }
        Ok(())
    }

    fn word_symbol(cell: &Cell) -> Option<u32> {
        type_of(cell)
            .and_then(TypeId::datatype)
            .filter(|dt| dt.is_any_word())
            .map(|_| cell.payload_lo())
    }

    fn spelling(&self, cell: &Cell) -> RuntimeResult<String> {
        let sym = Self::word_symbol(cell)
            .ok_or_else(|| Failure::usage("spelling requested for a non-word cell"))?;
        self.symbols
            .borrow()
            .name(sym)
            .map(str::to_owned)
            .ok_or_else(|| Failure::fatal("Red Crash", format!("unknown symbol id {sym}")))
    }

    fn render(&self, cell: &Cell, mold: bool) -> RuntimeResult<String> {
        let Some(id) = type_of(cell) else {
            return Err(Failure::usage("cannot render an invalid cell"));
        };
        let text = match id {
            TypeId::Unset => String::new(),
            TypeId::None => "none".to_owned(),
            TypeId::Logic => (cell.payload() != 0).to_string(),
            TypeId::Integer => Self::integer_of(cell).unwrap_or(0).to_string(),
            TypeId::Float => format_float(Self::float_of(cell).unwrap_or(0.0)),
            TypeId::Char => {
                let c = Self::character_of(cell).unwrap_or('\0');
                if mold {
                    format!("#\"{c}\"")
                } else {
                    c.to_string()
                }
            }
            TypeId::Word => self.spelling(cell)?,
            TypeId::SetWord => format!("{}:", self.spelling(cell)?),
            TypeId::GetWord => format!(":{}", self.spelling(cell)?),
            TypeId::LitWord if mold => format!("'{}", self.spelling(cell)?),
            TypeId::LitWord => self.spelling(cell)?,
            TypeId::Refinement => format!("/{}", self.spelling(cell)?),
            TypeId::Issue => format!("#{}", self.spelling(cell)?),
            _ => return Err(coming_soon("Red molding of series and contexts")),
        };
        Ok(text)
    }
}

/// `1.0`, `0.5`, `1e+20`
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl Runtime for RedRuntime {
    const NAME: &'static str = "red";

    fn new(config: EngineConfig) -> Self {
        RedRuntime {
            symbols: RefCell::new(Symbols::default()),
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
            State::Ready => Ok(false),
            State::ShutDown => Err(Failure::fatal("Shutdown", "the interpreter was shut down")),
            State::Fresh => {
                if std::mem::size_of::<Cell>() != 16 {
                    return Err(Failure::fatal("Red Crash", "cell layout is not 128 bits"));
                }
                self.cancel.clear();
                self.state.set(State::Ready);
                tracing::debug!("red backend initialized");
                Ok(true)
            }
        }
    }

    fn is_initialized(&self) -> bool {
        self.state.get() == State::Ready
    }

    fn classify(cell: &Cell) -> Option<Datatype> {
        type_of(cell).and_then(TypeId::datatype)
    }

    fn stamp(cell: &mut Cell, datatype: Datatype) {
        cell.set_header(TypeId::of(datatype).header());
    }

    fn datatype_name(datatype: Datatype) -> &'static str {
        TypeId::of(datatype).name()
    }

    fn needs_refcount(_cell: &Cell) -> bool {
        false
    }

    fn series_index(cell: &Cell) -> usize {
        cell.extra() as usize
    }

    fn set_series_index(cell: &mut Cell, index: usize) {
        cell.set_extra(u32::try_from(index).unwrap_or(u32::MAX));
    }

    fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    fn make_unset() -> Cell {
        scalar(TypeId::Unset, 0)
    }

    fn make_none() -> Cell {
        scalar(TypeId::None, 0)
    }

    fn make_logic(value: bool) -> Cell {
        scalar(TypeId::Logic, u64::from(value))
    }

    fn make_integer(value: i64) -> Cell {
        scalar(TypeId::Integer, u64::from_ne_bytes(value.to_ne_bytes()))
    }

    fn make_float(value: f64) -> Cell {
        scalar(TypeId::Float, value.to_bits())
    }

    fn make_character(value: char) -> Cell {
        scalar(TypeId::Char, u64::from(u32::from(value)))
    }

    fn logic_of(cell: &Cell) -> Option<bool> {
        (type_of(cell)? == TypeId::Logic).then(|| cell.payload() != 0)
    }

    fn integer_of(cell: &Cell) -> Option<i64> {
        (type_of(cell)? == TypeId::Integer).then(|| i64::from_ne_bytes(cell.payload().to_ne_bytes()))
    }

    fn float_of(cell: &Cell) -> Option<f64> {
        (type_of(cell)? == TypeId::Float).then(|| f64::from_bits(cell.payload()))
    }

    fn character_of(cell: &Cell) -> Option<char> {
        if type_of(cell)? != TypeId::Char {
            return None;
        }
        char::from_u32(cell.payload_lo())
    }

    fn make_word(
        &self,
        kind: Datatype,
        spelling: &str,
        context: Option<&Cell>,
    ) -> RuntimeResult<Cell> {
        if !kind.is_any_word() {
            return Err(Failure::usage(format!("{kind} is not a word type")));
        }
        if context.is_some() {
            return Err(coming_soon("Red word binding"));
        }
        self.ready()?;
        let sym = self.symbols.borrow_mut().intern(spelling);
        Ok(scalar(TypeId::of(kind), u64::from(sym)))
    }

    fn make_string(&self, _kind: Datatype, _text: &str) -> RuntimeResult<Cell> {
        Err(coming_soon("Red strings"))
    }

    fn make_array(
        &self,
        _kind: Datatype,
        _items: &[Loaded],
        _context: Option<&Cell>,
    ) -> RuntimeResult<Cell> {
        Err(coming_soon("Red arrays"))
    }

    fn spelling_of(&self, cell: &Cell) -> RuntimeResult<String> {
        match Self::classify(cell) {
            Some(dt) if dt.is_any_word() => self.spelling(cell),
            Some(dt) if dt.is_any_string() => Err(coming_soon("Red strings")),
            _ => Err(Failure::usage("spelling requested for a non-word cell")),
        }
    }

    fn make_context(&self, _parent: Option<&Cell>) -> RuntimeResult<Cell> {
        Err(coming_soon("Red contexts"))
    }

    fn user_context(&self) -> RuntimeResult<Cell> {
        Err(coming_soon("Red contexts"))
    }

    fn lib_context(&self) -> RuntimeResult<Cell> {
        Err(coming_soon("Red contexts"))
    }

    fn context_get(&self, _context: &Cell, _key: &str) -> RuntimeResult<Option<Cell>> {
        Err(coming_soon("Red contexts"))
    }

    fn context_set(&self, _context: &Cell, _key: &str, _value: &Cell) -> RuntimeResult<()> {
        Err(coming_soon("Red contexts"))
    }

    fn apply(
        &self,
        _applicand: Option<&Cell>,
        _args: &[Loaded],
        _context: Option<&Cell>,
    ) -> RuntimeResult<Option<Cell>> {
        self.ready()?;
        if self.cancel.take() {
            return Err(Failure::Halted);
        }
        Err(coming_soon("Red apply"))
    }

    fn form(&self, cell: &Cell) -> RuntimeResult<String> {
        self.render(cell, false)
    }

    fn mold(&self, cell: &Cell, _all: bool) -> RuntimeResult<String> {
        self.render(cell, true)
    }

    fn is_equal(&self, a: &Cell, b: &Cell) -> RuntimeResult<bool> {
        let (Some(ta), Some(tb)) = (Self::classify(a), Self::classify(b)) else {
            return Err(Failure::usage("cannot compare an invalid cell"));
        };
        if ta.is_any_word() && tb.is_any_word() {
            let (sa, sb) = (a.payload_lo(), b.payload_lo());
            return Ok(self.symbols.borrow().same_word(sa, sb));
        }
        #[allow(clippy::cast_precision_loss, reason = "numeric equality across types")]
        let equal = match (ta, tb) {
            (Datatype::Integer, Datatype::Float) => {
                Self::integer_of(a).map(|n| n as f64) == Self::float_of(b)
            }
            (Datatype::Float, Datatype::Integer) => {
                Self::float_of(a) == Self::integer_of(b).map(|n| n as f64)
            }
            (Datatype::Float, Datatype::Float) => Self::float_of(a) == Self::float_of(b),
            (Datatype::Character, Datatype::Character) => {
                let lower = |c: Option<char>| c.map(|c| c.to_lowercase().collect::<String>());
                lower(Self::character_of(a)) == lower(Self::character_of(b))
            }
            _ if ta.is_scalar() && ta == tb => a.payload() == b.payload(),
            _ if ta.is_scalar() || tb.is_scalar() => false,
            _ => return Err(coming_soon("Red comparison of series and contexts")),
        };
        Ok(equal)
    }

    fn copy(&self, cell: &Cell, _deep: bool) -> RuntimeResult<Cell> {
        match Self::classify(cell) {
            Some(dt) if dt.is_scalar() || dt.is_any_word() => Ok(*cell),
            Some(_) => Err(coming_soon("Red copy of series and contexts")),
            None => Err(Failure::usage("cannot copy an invalid cell")),
        }
    }

    fn series_tail(&self, _cell: &Cell) -> RuntimeResult<usize> {
        Err(coming_soon("Red series iteration"))
    }

    fn series_pick(&self, _cell: &Cell, _pos: usize) -> RuntimeResult<Option<Cell>> {
        Err(coming_soon("Red series iteration"))
    }

    fn gc_pending(&self) -> bool {
        false
    }

    fn collect_garbage(&self, _roots: &mut dyn Iterator<Item = Cell>) -> usize {
        0
    }

    fn shutdown(&self) {
        if self.state.get() != State::ShutDown {
            self.state.set(State::ShutDown);
            tracing::debug!(symbols = self.symbols.borrow().len(), "red backend shut down");
        }
    }
}

#[cfg(test)]
mod tests;
