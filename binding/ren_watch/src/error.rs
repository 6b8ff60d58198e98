use ren::RenError;

pub type WatchResult<T> = Result<T, WatchError>;

#[derive(Clone, Debug, thiserror::Error)]
pub enum WatchError {
    #[error("integer argument must be nonzero")]
    ZeroIndex,

    #[error("no such watch list item: {0}")]
    NoSuchIndex(usize),

    #[error("unknown tag name in watch list: {0}")]
    UnknownLabel(String),

    #[error("unexpected {0} passed to the watch dialect")]
    UnexpectedType(&'static str),

    /// Evaluating the watch, or reading its last result, failed.
    #[error(transparent)]
    Ren(#[from] RenError),
}
