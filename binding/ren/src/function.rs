//! Callable values.

use ren_cell::Datatype;

use crate::subtype::define_subtype;
use crate::{AnyValue, Block, Engine, Loadable, RenResult};

define_subtype! {
    /// A `function!`, or a native (accepted, never produced by a stamp).
    Function => Datatype::Function | Datatype::Native
}

impl Function {
    /// `func spec body`, made in the engine `spec` belongs to.
    pub fn new(spec: &Block, body: &Block) -> RenResult<Function> {
        Self::new_in(spec, body, spec.engine())
    }

    pub fn new_in(spec: &Block, body: &Block, engine: &Engine) -> RenResult<Function> {
        let made = engine.eval(&[Loadable::from("func"), spec.into(), body.into()])?;
        made.unwrap_or_else(|| AnyValue::unset_in(engine)).into_cast()
    }

    /// Call with `args` as the argument expressions.
    pub fn call(&self, args: &[Loadable]) -> RenResult<Option<AnyValue>> {
        self.apply(args)
    }
}
