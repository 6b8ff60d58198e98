//! Binding environments.

use ren_cell::{Datatype, Runtime};

use crate::subtype::define_subtype;
use crate::{AnyValue, Engine, Loadable, RenResult};

define_subtype! {
    /// An `object!`: a set of words bound to values.
    ///
    /// Every engine owns two: `lib`, holding natives and library functions,
    /// and `user`, the default binding target, whose lookups fall through
    /// to `lib`. Contexts made here also see `lib`.
    Context => Datatype::Object
}

impl Context {
    /// A fresh context in the default engine.
    pub fn new() -> RenResult<Context> {
        Self::new_in(&Engine::current())
    }

    pub fn new_in(engine: &Engine) -> RenResult<Context> {
        let lib = Self::lib_in(engine)?;
        Self::with_parent(&lib)
    }

    /// A fresh context whose lookups fall through to `parent`.
    pub fn with_parent(parent: &Context) -> RenResult<Context> {
        let engine = parent.engine();
        let cell = engine.call(|rt| rt.make_context(Some(parent.cell())))?;
        Ok(Context(AnyValue::from_cell(cell, engine)))
    }

    pub fn user_in(engine: &Engine) -> RenResult<Context> {
        let cell = engine.call(|rt| rt.user_context())?;
        Ok(Context(AnyValue::from_cell(cell, engine)))
    }

    pub fn lib_in(engine: &Engine) -> RenResult<Context> {
        let cell = engine.call(|rt| rt.lib_context())?;
        Ok(Context(AnyValue::from_cell(cell, engine)))
    }

    /// The value of `key` here or in a parent. `None` when the key is
    /// absent or unset.
    pub fn get(&self, key: &str) -> RenResult<Option<AnyValue>> {
        let engine = self.engine();
        let value = engine.call(|rt| rt.context_get(self.cell(), key))?;
        Ok(value.map(|cell| AnyValue::from_cell(cell, engine)))
    }

    /// Set `key`, adding it if missing.
    pub fn set(&self, key: &str, value: impl Into<AnyValue>) -> RenResult<()> {
        let value = value.into();
        let engine = self.engine();
        engine.same_engine(&value)?;
        engine.call(|rt| rt.context_set(self.cell(), key, value.cell()))
    }

    pub fn contains(&self, key: &str) -> RenResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Evaluate `loadables` with their words bound here.
    pub fn eval(&self, loadables: &[Loadable]) -> RenResult<Option<AnyValue>> {
        self.engine().eval_in(loadables, self)
    }
}
