//! Failures a backend reports to the host binding.

use crate::Cell;

/// Result of a backend operation.
pub type RuntimeResult<T> = Result<T, Failure>;

/// Everything that can interrupt a backend operation.
///
/// Interpreter errors and throws carry cells that belong to the backend which
/// produced them; the host binding wraps those cells before the next
/// collection can run.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Failure {
    /// An `error!` value escaped to the top of an evaluation.
    #[error("evaluation raised an error value")]
    Error { error: Cell },

    /// A `throw` with no matching `catch`.
    #[error("uncaught throw")]
    Throw {
        value: Option<Cell>,
        name: Option<Cell>,
    },

    /// Evaluation stopped because the cancel flag was raised.
    #[error("evaluation halted")]
    Halted,

    /// Unrecoverable backend condition. The engine is unusable afterwards.
    #[error("{title} : {content}")]
    Fatal { title: String, content: String },

    /// The backend does not support this operation yet.
    #[error("{feature} coming soon...")]
    NotImplemented { feature: &'static str },

    /// The caller asked for something that makes no sense for the given cells.
    #[error("{0}")]
    Usage(String),
}

impl Failure {
    #[cold]
    pub fn fatal(title: impl Into<String>, content: impl Into<String>) -> Self {
        Failure::Fatal {
            title: title.into(),
            content: content.into(),
        }
    }

    #[cold]
    pub fn usage(msg: impl Into<String>) -> Self {
        Failure::Usage(msg.into())
    }

    #[cold]
    pub fn not_implemented(feature: &'static str) -> Self {
        Failure::NotImplemented { feature }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn fatal_display_joins_title_and_content() {
        let failure = Failure::fatal("Rebol Crash", "out of memory");
        assert_eq!(failure.to_string(), "Rebol Crash : out of memory");
    }

    #[test]
    fn not_implemented_mentions_feature() {
        let failure = Failure::not_implemented("Red apply");
        assert_eq!(failure.to_string(), "Red apply coming soon...");
    }
}
