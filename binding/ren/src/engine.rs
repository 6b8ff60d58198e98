//! Interpreter instances.
//!
//! An [`Engine`] is a cheap, clonable handle to one backend instance and its
//! live-set. Handles are `!Send`: an engine and every value made from it
//! stay on the thread that created them. Each thread has a replaceable
//! default handle ([`Engine::current`]) used by constructors that are not
//! given one; it is created from [`EngineConfig::from_env`] on first use.
//!
//! The backend is brought up lazily, on the first operation that needs the
//! evaluator, so configuration can be settled before anything runs. The
//! backend is shut down when the last handle goes away.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ren_cell::{CancelFlag, Cell, Datatype, EngineConfig, Failure, Runtime, RuntimeResult};

use crate::backend::Backend;
use crate::live::{LiveKey, LiveSet};
use crate::{
    loadable, AnyValue, Context, Error, EvaluationError, EvaluationThrow, Loadable, RenError,
    RenResult,
};

#[derive(Clone)]
pub struct Engine {
    inner: Rc<EngineInner>,
}

struct EngineInner {
    runtime: Backend,
    live: RefCell<LiveSet>,
    /// Set once the backend reports a fatal condition.
    fatal: RefCell<Option<(String, String)>>,
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        self.runtime.shutdown();
    }
}

thread_local! {
    static CURRENT: RefCell<Option<Engine>> = const { RefCell::new(None) };
}

impl Engine {
    pub fn new(config: EngineConfig) -> Engine {
        tracing::debug!(backend = Backend::NAME, "creating engine");
        Engine {
            inner: Rc::new(EngineInner {
                runtime: Backend::new(config),
                live: RefCell::new(LiveSet::new()),
                fatal: RefCell::new(None),
            }),
        }
    }

    /// This thread's default engine, created on first use.
    pub fn current() -> Engine {
        CURRENT.with(|current| {
            current
                .borrow_mut()
                .get_or_insert_with(|| Engine::new(EngineConfig::from_env()))
                .clone()
        })
    }

    /// Make `engine` this thread's default, returning the previous one.
    pub fn set_current(engine: Engine) -> Option<Engine> {
        CURRENT.with(|current| current.borrow_mut().replace(engine))
    }

    /// Forget this thread's default. The next [`Engine::current`] makes a
    /// fresh one.
    pub fn clear_current() -> Option<Engine> {
        CURRENT.with(|current| current.borrow_mut().take())
    }

    pub fn ptr_eq(&self, other: &Engine) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn config(&self) -> &EngineConfig {
        self.inner.runtime.config()
    }

    /// Bring the backend up. `Ok(true)` only on the call that did the work.
    #[tracing::instrument(level = "debug", skip_all, fields(backend = Backend::NAME))]
    pub fn lazy_initialize(&self) -> RenResult<bool> {
        self.call(Backend::lazy_initialize)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.runtime.is_initialized()
    }

    /// Whether a fatal backend condition has retired this engine.
    pub fn is_dead(&self) -> bool {
        self.inner.fatal.borrow().is_some()
    }

    /// Flag that interrupts evaluation when raised. May be sent to and raised
    /// from another thread.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.inner.runtime.cancel_flag()
    }

    pub fn cancel(&self) {
        self.inner.runtime.cancel();
    }

    /// The context new words bind into by default.
    pub fn user(&self) -> RenResult<Context> {
        Context::user_in(self)
    }

    /// The context holding natives and library functions.
    pub fn lib(&self) -> RenResult<Context> {
        Context::lib_in(self)
    }

    /// Evaluate `loadables` in the user context.
    pub fn eval(&self, loadables: &[Loadable]) -> RenResult<Option<AnyValue>> {
        self.apply(None, loadables, None)
    }

    pub fn eval_in(&self, loadables: &[Loadable], context: &Context) -> RenResult<Option<AnyValue>> {
        self.apply(None, loadables, Some(context))
    }

    /// Run a collection now, with every host-held value as a root. Returns
    /// how many backend nodes were freed.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn recycle(&self) -> usize {
        if self.is_dead() || !self.is_initialized() {
            return 0;
        }
        let roots: Vec<Cell> = self.inner.live.borrow().cells().collect();
        let count = roots.len();
        let freed = self.inner.runtime.collect_garbage(&mut roots.into_iter());
        tracing::debug!(roots = count, freed, "collection finished");
        freed
    }

    /// Number of host-held values currently registered as roots.
    pub fn live_count(&self) -> usize {
        self.inner.live.borrow().len()
    }

    pub(crate) fn runtime(&self) -> &Backend {
        &self.inner.runtime
    }

    pub(crate) fn register(&self, cell: &Cell) -> Option<LiveKey> {
        if !Backend::needs_refcount(cell) {
            return None;
        }
        let mut live = self.inner.live.borrow_mut();
        let key = live.insert(*cell);
        tracing::trace!(live = live.len(), "registered value");
        Some(key)
    }

    pub(crate) fn update(&self, key: LiveKey, cell: &Cell) {
        self.inner.live.borrow_mut().update(key, *cell);
    }

    pub(crate) fn release(&self, key: LiveKey) {
        // Reached from `Drop`, so never panic on a busy live-set.
        if let Ok(mut live) = self.inner.live.try_borrow_mut() {
            live.remove(key);
        }
    }

    /// Refuse to combine values from different engines.
    pub(crate) fn same_engine(&self, value: &AnyValue) -> RenResult<()> {
        if self.ptr_eq(value.engine()) {
            Ok(())
        } else {
            Err(RenError::usage("values from different engines cannot be combined"))
        }
    }

    /// Run one backend operation, translating its failure.
    pub(crate) fn call<T>(&self, op: impl FnOnce(&Backend) -> RuntimeResult<T>) -> RenResult<T> {
        if let Some((title, content)) = self.inner.fatal.borrow().clone() {
            return Err(RenError::Fatal { title, content });
        }
        op(&self.inner.runtime).map_err(|failure| self.bridge(failure))
    }

    /// Evaluate `[applicand args...]`. Source arguments bind in `context`
    /// (user context when `None`).
    #[tracing::instrument(level = "debug", skip_all, fields(args = args.len()))]
    pub(crate) fn apply(
        &self,
        applicand: Option<&AnyValue>,
        args: &[Loadable],
        context: Option<&Context>,
    ) -> RenResult<Option<AnyValue>> {
        if let Some(applicand) = applicand {
            self.same_engine(applicand)?;
        }
        if let Some(context) = context {
            self.same_engine(context)?;
        }
        self.lazy_initialize()?;
        self.collect_if_pending();

        let context = context.map(|c| *c.cell());
        let loaded = loadable::resolve(self, args, Datatype::Block, context.as_ref())?;
        let result = self.call(|rt| rt.apply(applicand.map(AnyValue::cell), &loaded, context.as_ref()))?;
        Ok(result.map(|cell| AnyValue::from_cell(cell, self)))
    }

    /// Scan `source` bound into `context`; one item comes back bare.
    pub(crate) fn load(&self, source: &str, context: &Cell) -> RenResult<AnyValue> {
        let loaded = [ren_cell::Loaded::from(source)];
        let block = self.call(|rt| rt.make_array(Datatype::Block, &loaded, Some(context)))?;
        let block = AnyValue::from_cell(block, self);
        if self.call(|rt| rt.series_tail(block.cell()))? == 1 {
            if let Some(item) = self.call(|rt| rt.series_pick(block.cell(), 0))? {
                return Ok(AnyValue::from_cell(item, self));
            }
        }
        Ok(block)
    }

    fn collect_if_pending(&self) {
        if self.inner.runtime.gc_pending() {
            self.recycle();
        }
    }

    #[cold]
    fn bridge(&self, failure: Failure) -> RenError {
        match failure {
            Failure::Error { error } => {
                match AnyValue::from_cell(error, self).into_cast::<Error>() {
                    Ok(error) => RenError::Evaluation(EvaluationError::new(error)),
                    Err(err) => err,
                }
            }
            Failure::Throw { value, name } => RenError::Throw(EvaluationThrow::new(
                value.map(|cell| AnyValue::from_cell(cell, self)),
                name.map(|cell| AnyValue::from_cell(cell, self)),
            )),
            Failure::Halted => RenError::Halted,
            Failure::Fatal { title, content } => {
                tracing::error!(%title, %content, "backend fatal error");
                *self.inner.fatal.borrow_mut() = Some((title.clone(), content.clone()));
                RenError::Fatal { title, content }
            }
            Failure::NotImplemented { feature } => RenError::NotImplemented { feature },
            Failure::Usage(msg) => RenError::Usage(msg),
        }
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("backend", &Backend::NAME)
            .field("initialized", &self.is_initialized())
            .field("live", &self.live_count())
            .finish()
    }
}
