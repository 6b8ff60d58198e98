//! Value cell and backend contract shared by the Ren binding crates.
//!
//! - [`Cell`]: the fixed 128-bit datum every backend stores values in.
//! - [`Datatype`]: backend-neutral type enumeration.
//! - [`Runtime`]: what a backend must provide.
//! - [`Failure`]: how a backend reports errors, throws and fatal conditions.
//! - [`EngineConfig`], [`CancelFlag`], [`PrintHandler`]: engine settings and
//!   plumbing shared by host and backend.

mod cancel;
mod cell;
mod config;
mod datatype;
mod failure;
mod print_handler;
mod runtime;

pub use cancel::CancelFlag;
pub use cell::Cell;
pub use config::{EngineConfig, DEFAULT_GC_THRESHOLD};
pub use datatype::Datatype;
pub use failure::{Failure, RuntimeResult};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandler, SharedPrintHandler,
};
pub use runtime::{Loaded, Runtime};
