//! Host-side value model for an embedded Rebol-style interpreter.
//!
//! Every interpreter value is a 128-bit [`Cell`] owned by a backend. The
//! host sees it through [`AnyValue`], which keeps collectable cells alive
//! while the wrapper exists, and through statically typed narrowings such as
//! [`Integer`], [`Word`] or [`Block`]. Narrowing goes through each subtype's
//! dispatcher and fails with [`RenError::InvalidCast`] on mismatch.
//!
//! The backend is chosen at build time: `rebol` (the default) is a complete
//! interpreter, `red` covers scalars and words and reports everything else
//! as not yet implemented.
//!
//! # Architecture
//!
//! - [`Engine`]: one backend instance plus its live-set of host-held cells,
//!   with a replaceable per-thread default
//! - [`AnyValue`]: the base wrapper; casting, equality, copy, apply, form and mold
//! - [`Subtype`]: atoms, the word, array and string families, [`Function`],
//!   [`Context`] and [`Error`], each narrowed by its [`CellFunction`]
//! - [`Loadable`]: source text, values and brace groups that build arrays
//!   and apply arguments
//! - [`Series`]: 1-based indexing, iteration and [`SeriesCursor`]
//! - [`RenError`]: backend failures bridged into host errors
//!
//! # Re-exports
//!
//! The cell, datatype, configuration, cancellation and print handler types
//! come from `ren_cell`.
//!
//! ```
//! use ren::{AnyArray, AnyValue, Block, Engine, EngineConfig, Integer};
//!
//! let engine = Engine::new(EngineConfig::default());
//! # #[cfg(feature = "rebol")]
//! # {
//! let sum = engine.eval(&ren::loadables!["1 +", 2]).unwrap().unwrap();
//! assert_eq!(sum.cast::<Integer>().unwrap().value(), 3);
//!
//! let block = Block::new_in(&ren::loadables!["a", {"b"}], &engine).unwrap();
//! assert_eq!(block.mold().unwrap(), "[a [b]]");
//! # }
//! ```

mod arrays;
mod atoms;
mod backend;
mod context;
mod engine;
mod error;
mod function;
mod live;
mod loadable;
mod series;
mod strings;
mod subtype;
mod value;
mod words;

use std::sync::Once;

pub use arrays::{AnyArray, Block, GetPath, Group, LitPath, Path, SetPath};
pub use atoms::{Character, Float, Integer, Logic, RenNone};
pub use context::Context;
pub use engine::Engine;
pub use error::{Error, EvaluationError, EvaluationThrow, RenError, RenResult};
pub use function::Function;
pub use loadable::Loadable;
pub use series::{Series, SeriesCursor, SeriesIter};
pub use strings::{AnyString, Filename, RenString, Tag, Url};
pub use subtype::{CellFunction, Subtype};
pub use value::{AnyValue, Literal};
pub use words::{AnyWord, GetWord, HasSpelling, Issue, LitWord, Refinement, SetWord, Word};

pub use ren_cell::{
    buffer_handler, silent_handler, stdout_handler, CancelFlag, Cell, Datatype, EngineConfig,
    PrintHandler, SharedPrintHandler,
};

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber when `RUST_LOG` is set. Safe to call more
/// than once; only the first call has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .init();
        }
    });
}
