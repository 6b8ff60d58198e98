//! Host-level failures.
//!
//! Everything a backend reports arrives as a `ren_cell::Failure` carrying raw
//! cells; [`Engine`](crate::Engine) wraps those cells into values and turns
//! the failure into a [`RenError`] before anything else can run.

use std::fmt;

use ren_cell::Datatype;

use crate::subtype::define_subtype;
use crate::{AnyString, AnyValue, Context, Engine, Loadable, RenString};

/// Result alias used throughout the binding.
pub type RenResult<T> = Result<T, RenError>;

#[derive(Clone, Debug, thiserror::Error)]
pub enum RenError {
    /// A cast asked for a subtype the value does not hold.
    #[error("invalid cast: expected {expected}, found {actual}")]
    InvalidCast {
        expected: &'static str,
        actual: &'static str,
    },

    /// Evaluation raised an `error!` value.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// A `throw` reached the host without a matching `catch`.
    #[error(transparent)]
    Throw(#[from] EvaluationThrow),

    /// Evaluation stopped because the cancel flag was raised.
    #[error("evaluation halted")]
    Halted,

    /// The backend hit an unrecoverable condition. The engine that reported
    /// it refuses further work.
    #[error("{title} : {content}")]
    Fatal { title: String, content: String },

    /// A raw cell could not be attached to an engine.
    #[error("unbound value: {0}")]
    Unbound(String),

    /// The binding was used in a way that makes no sense.
    #[error("{0}")]
    Usage(String),

    /// The active backend does not support this operation yet.
    #[error("{feature} coming soon...")]
    NotImplemented { feature: &'static str },
}

impl RenError {
    #[cold]
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        RenError::Usage(msg.into())
    }

    #[cold]
    pub(crate) fn invalid_cast(expected: Datatype, actual: Option<Datatype>) -> Self {
        RenError::InvalidCast {
            expected: expected.name(),
            actual: actual.map_or("invalid cell", Datatype::name),
        }
    }

    /// The error value, when this is an evaluation error.
    pub fn error_value(&self) -> Option<&Error> {
        match self {
            RenError::Evaluation(e) => Some(e.error()),
            _ => None,
        }
    }
}

/// An `error!` value that escaped an evaluation.
///
/// Displays as the interpreter's own diagnostic text
/// (`** Script error: ...`).
#[derive(Clone, Debug)]
pub struct EvaluationError {
    error: Error,
}

impl EvaluationError {
    pub(crate) fn new(error: Error) -> Self {
        EvaluationError { error }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    pub fn into_error(self) -> Error {
        self.error
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for EvaluationError {}

/// Non-local control transfer with an optional value and an optional name.
#[derive(Clone, Debug)]
pub struct EvaluationThrow {
    value: Option<AnyValue>,
    name: Option<AnyValue>,
}

impl EvaluationThrow {
    pub fn new(value: Option<AnyValue>, name: Option<AnyValue>) -> Self {
        EvaluationThrow { value, name }
    }

    pub fn value(&self) -> Option<&AnyValue> {
        self.value.as_ref()
    }

    pub fn name(&self) -> Option<&AnyValue> {
        self.name.as_ref()
    }
}

impl fmt::Display for EvaluationThrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.name.is_some() { "THROW/NAME: " } else { "THROW: " })?;
        match &self.value {
            Some(value) => write!(f, "{value}")?,
            None => f.write_str("(no value)")?,
        }
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvaluationThrow {}

define_subtype! {
    /// An `error!` value.
    Error => Datatype::Error
}

impl Error {
    /// A user error carrying `message`, made with the default engine.
    pub fn new(message: &str) -> RenResult<Error> {
        Self::new_in(message, &Engine::current())
    }

    pub fn new_in(message: &str, engine: &Engine) -> RenResult<Error> {
        let text = RenString::new_in(message, engine)?;
        engine
            .eval(&[Loadable::from("make error!"), text.into()])?
            .ok_or_else(|| RenError::usage("make error! produced no value"))?
            .into_cast()
    }

    /// The error's fields as a context.
    pub fn fields(&self) -> Context {
        crate::subtype::restamp::<Context>(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_cast_names_both_types() {
        let err = RenError::invalid_cast(Datatype::Float, Some(Datatype::Integer));
        assert_eq!(
            err.to_string(),
            "invalid cast: expected decimal!, found integer!"
        );
        let err = RenError::invalid_cast(Datatype::Block, None);
        assert_eq!(err.to_string(), "invalid cast: expected block!, found invalid cell");
    }

    #[test]
    fn throw_without_value_says_so() {
        let thrown = EvaluationThrow::new(None, None);
        assert_eq!(thrown.to_string(), "THROW: (no value)");
    }

    #[test]
    fn fatal_text_is_verbatim() {
        let err = RenError::Fatal {
            title: "Rebol Crash".to_owned(),
            content: "bad cell".to_owned(),
        };
        assert_eq!(err.to_string(), "Rebol Crash : bad cell");
    }
}
