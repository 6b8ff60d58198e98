//! Build-time backend selection.
//!
//! Exactly one of the `rebol` and `red` features picks the interpreter. This
//! is the only module that names a concrete backend type; everything else
//! goes through [`Backend`] and the `Runtime` trait.

#[cfg(all(feature = "rebol", feature = "red"))]
compile_error!("features `rebol` and `red` are mutually exclusive");

#[cfg(not(any(feature = "rebol", feature = "red")))]
compile_error!("one of the features `rebol` or `red` must be enabled");

#[cfg(feature = "rebol")]
pub type Backend = ren_rebol::RebolRuntime;

#[cfg(all(feature = "red", not(feature = "rebol")))]
pub type Backend = ren_red::RedRuntime;
