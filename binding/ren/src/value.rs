//! The base value wrapper.
//!
//! An [`AnyValue`] owns one backend cell plus a handle to the engine that
//! produced it. Cells that reference collectable memory are registered in the
//! engine's live-set for as long as the wrapper exists, so the collector
//! treats them as roots. Cloning registers a second entry; dropping releases
//! it; [`AnyValue::take`] moves the registration out and leaves `none`
//! behind.

mod privileged;

use std::fmt;

use ren_cell::{Cell, Datatype, Runtime};

use crate::backend::Backend;
use crate::live::LiveKey;
use crate::subtype::Subtype;
use crate::{Context, Engine, HasSpelling, Loadable, RenError, RenResult};

pub struct AnyValue {
    cell: Cell,
    engine: Engine,
    key: Option<LiveKey>,
}

/// Host primitives that map straight onto immediate cells.
pub trait Literal: Copy {
    fn to_cell(self) -> Cell;
}

impl Literal for bool {
    fn to_cell(self) -> Cell {
        Backend::make_logic(self)
    }
}

impl Literal for char {
    fn to_cell(self) -> Cell {
        Backend::make_character(self)
    }
}

impl Literal for i32 {
    fn to_cell(self) -> Cell {
        Backend::make_integer(i64::from(self))
    }
}

impl Literal for i64 {
    fn to_cell(self) -> Cell {
        Backend::make_integer(self)
    }
}

impl Literal for f64 {
    fn to_cell(self) -> Cell {
        Backend::make_float(self)
    }
}

impl AnyValue {
    /// A literal in `engine`. Never needs the interpreter to be running.
    pub fn with_engine(literal: impl Literal, engine: &Engine) -> AnyValue {
        AnyValue::from_cell(literal.to_cell(), engine)
    }

    pub fn none() -> AnyValue {
        Self::none_in(&Engine::current())
    }

    pub fn none_in(engine: &Engine) -> AnyValue {
        AnyValue::from_cell(Backend::make_none(), engine)
    }

    pub fn unset() -> AnyValue {
        Self::unset_in(&Engine::current())
    }

    pub fn unset_in(engine: &Engine) -> AnyValue {
        AnyValue::from_cell(Backend::make_unset(), engine)
    }

    /// Scan `source` in the default engine. A single item comes back as
    /// itself; anything else comes back as a block of the items.
    pub fn load(source: &str) -> RenResult<AnyValue> {
        Self::load_in(source, &Engine::current())
    }

    pub fn load_in(source: &str, engine: &Engine) -> RenResult<AnyValue> {
        let user = engine.call(Backend::user_context)?;
        engine.load(source, &user)
    }

    /// Scan `source` and bind its words into `context`.
    pub fn load_in_context(source: &str, context: &Context) -> RenResult<AnyValue> {
        context.engine().load(source, context.cell())
    }

    /// Attach a raw cell to `engine`. Fails with [`RenError::Unbound`] when
    /// the backend does not recognize the bits as a value.
    pub fn from_raw_cell(cell: Cell, engine: &Engine) -> RenResult<AnyValue> {
        let mut value = AnyValue::vacant(engine);
        value.cell = cell;
        value.finish_init(engine)?;
        Ok(value)
    }

    /// Like [`AnyValue::from_raw_cell`] but reports an invalid cell as
    /// `None`.
    pub fn try_from_raw_cell(cell: Cell, engine: &Engine) -> Option<AnyValue> {
        let mut value = AnyValue::vacant(engine);
        value.cell = cell;
        value.try_finish_init(engine).then_some(value)
    }

    pub fn raw_cell(&self) -> Cell {
        self.cell
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The backend's classification of the cell.
    pub fn datatype(&self) -> Option<Datatype> {
        Backend::classify(&self.cell)
    }

    /// Backend name of the datatype (`integer!`), or `"invalid"`.
    pub fn type_name(&self) -> &'static str {
        self.datatype().map_or("invalid", Backend::datatype_name)
    }

    fn is(&self, dt: Datatype) -> bool {
        self.datatype() == Some(dt)
    }

    fn is_kind(&self, test: fn(Datatype) -> bool) -> bool {
        self.datatype().is_some_and(test)
    }

    pub fn is_unset(&self) -> bool {
        self.is(Datatype::Unset)
    }

    pub fn is_none(&self) -> bool {
        self.is(Datatype::None)
    }

    pub fn is_logic(&self) -> bool {
        self.is(Datatype::Logic)
    }

    pub fn is_true(&self) -> bool {
        Backend::logic_of(&self.cell) == Some(true)
    }

    pub fn is_false(&self) -> bool {
        Backend::logic_of(&self.cell) == Some(false)
    }

    pub fn is_character(&self) -> bool {
        self.is(Datatype::Character)
    }

    pub fn is_integer(&self) -> bool {
        self.is(Datatype::Integer)
    }

    pub fn is_float(&self) -> bool {
        self.is(Datatype::Float)
    }

    pub fn is_word(&self) -> bool {
        self.is(Datatype::Word)
    }

    pub fn is_any_word(&self) -> bool {
        self.is_kind(Datatype::is_any_word)
    }

    pub fn is_block(&self) -> bool {
        self.is(Datatype::Block)
    }

    pub fn is_group(&self) -> bool {
        self.is(Datatype::Group)
    }

    pub fn is_path(&self) -> bool {
        self.is(Datatype::Path)
    }

    pub fn is_any_array(&self) -> bool {
        self.is_kind(Datatype::is_any_array)
    }

    pub fn is_string(&self) -> bool {
        self.is(Datatype::String)
    }

    pub fn is_tag(&self) -> bool {
        self.is(Datatype::Tag)
    }

    pub fn is_any_string(&self) -> bool {
        self.is_kind(Datatype::is_any_string)
    }

    pub fn is_series(&self) -> bool {
        self.is_kind(Datatype::is_series)
    }

    pub fn is_function(&self) -> bool {
        self.is_kind(Datatype::is_any_function)
    }

    pub fn is_error(&self) -> bool {
        self.is(Datatype::Error)
    }

    pub fn is_context(&self) -> bool {
        self.is(Datatype::Object)
    }

    /// Conditional truth: everything except `none`, `false` and unset.
    pub fn truthy(&self) -> bool {
        !(self.is_none() || self.is_false() || self.is_unset())
    }

    /// The `copy` native. Scalars copy to themselves.
    pub fn copy(&self, deep: bool) -> RenResult<AnyValue> {
        let cell = self.engine.call(|rt| rt.copy(&self.cell, deep))?;
        Ok(AnyValue::from_cell(cell, &self.engine))
    }

    /// Narrow to `T`, failing with [`RenError::InvalidCast`] on mismatch.
    pub fn cast<T: Subtype>(&self) -> RenResult<T> {
        self.clone().into_cast()
    }

    pub fn into_cast<T: Subtype>(self) -> RenResult<T> {
        if T::accepts(&self) {
            Ok(T::wrap(self))
        } else {
            Err(RenError::invalid_cast(T::DATATYPE, self.datatype()))
        }
    }

    pub fn try_cast<T: Subtype>(&self) -> Option<T> {
        T::accepts(self).then(|| T::wrap(self.clone()))
    }

    /// Type test and spelling check in one call.
    pub fn is_equal_to_spelling<T: Subtype + HasSpelling>(&self, spelling: &str) -> bool {
        self.try_cast::<T>().is_some_and(|t| t.has_spelling(spelling))
    }

    /// The `equal?` comparison: case-insensitive for text, numeric across
    /// integers and decimals, content-wise for series.
    pub fn is_equal_to(&self, other: &AnyValue) -> RenResult<bool> {
        self.engine.same_engine(other)?;
        self.engine.call(|rt| rt.is_equal(&self.cell, &other.cell))
    }

    /// Identity: same series at the same index, same context, or the same
    /// immediate bits. Values from different engines are never the same.
    pub fn is_same_as(&self, other: &AnyValue) -> bool {
        self.engine.ptr_eq(&other.engine) && self.engine.runtime().is_same(&self.cell, &other.cell)
    }

    /// Move the value out, leaving `none` in its place.
    #[must_use]
    pub fn take(&mut self) -> AnyValue {
        let none = AnyValue::none_in(&self.engine);
        std::mem::replace(self, none)
    }

    /// Release the live-set entry and reset to `none`. Safe to repeat.
    pub fn uninitialize(&mut self) {
        if let Some(key) = self.key.take() {
            self.engine.release(key);
        }
        self.cell = Backend::make_none();
    }

    /// Evaluate `[self args...]` in the user context.
    pub fn apply(&self, args: &[Loadable]) -> RenResult<Option<AnyValue>> {
        self.engine.apply(Some(self), args, None)
    }

    /// Evaluate `[self args...]` with source arguments bound in `context`.
    pub fn apply_in(&self, args: &[Loadable], context: &Context) -> RenResult<Option<AnyValue>> {
        self.engine.apply(Some(self), args, Some(context))
    }

    /// Loadable source form.
    pub fn mold(&self) -> RenResult<String> {
        self.engine.call(|rt| rt.mold(&self.cell, false))
    }

    /// Source form with construction syntax for values that have no literal.
    pub fn mold_all(&self) -> RenResult<String> {
        self.engine.call(|rt| rt.mold(&self.cell, true))
    }

    /// Human-readable form, the text [`Display`](fmt::Display) prints.
    pub fn form(&self) -> RenResult<String> {
        self.engine.call(|rt| rt.form(&self.cell))
    }
}

impl Clone for AnyValue {
    fn clone(&self) -> Self {
        AnyValue::from_cell(self.cell, &self.engine)
    }
}

impl Drop for AnyValue {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            self.engine.release(key);
        }
    }
}

impl fmt::Display for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form() {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "#[{}]", self.type_name()),
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mold() {
            Ok(text) => write!(f, "AnyValue({text})"),
            Err(_) => write!(f, "AnyValue(#[{}] {:?})", self.type_name(), self.cell),
        }
    }
}

macro_rules! literal_conversions {
    ($($t:ty),*) => {$(
        impl From<$t> for AnyValue {
            fn from(literal: $t) -> AnyValue {
                AnyValue::with_engine(literal, &Engine::current())
            }
        }

        impl From<$t> for Loadable {
            fn from(literal: $t) -> Loadable {
                Loadable::Value(AnyValue::from(literal))
            }
        }
    )*};
}

literal_conversions!(bool, char, i32, i64, f64);

#[cfg(test)]
mod tests;
