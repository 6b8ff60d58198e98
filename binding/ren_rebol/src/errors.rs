//! Interpreter error conditions.
//!
//! `ErrorKind` is the structured form of every error the backend raises on
//! its own. Factory functions below are the way code builds them; the
//! evaluator turns a kind into an `error!` value (a frame with `code`,
//! `type`, `id`, `message`, `near`, `where` and `arg1`..`arg3`) only when the
//! error is caught or reaches the host.

use std::fmt;

/// Broad error class, shown as `** <Category> error: ...`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Category {
    Syntax,
    Script,
    Math,
    User,
    Internal,
}

impl Category {
    pub(crate) fn word(self) -> &'static str {
        match self {
            Category::Syntax => "syntax",
            Category::Script => "script",
            Category::Math => "math",
            Category::User => "user",
            Category::Internal => "internal",
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Category::Syntax => "Syntax",
            Category::Script => "Script",
            Category::Math => "Math",
            Category::User => "User",
            Category::Internal => "Internal",
        }
    }

    pub(crate) fn from_word(word: &str) -> Category {
        match word.to_ascii_lowercase().as_str() {
            "syntax" => Category::Syntax,
            "script" => Category::Script,
            "math" => Category::Math,
            "internal" => Category::Internal,
            _ => Category::User,
        }
    }

    pub(crate) fn base_code(self) -> i64 {
        match self {
            Category::Syntax => 200,
            Category::Script => 300,
            Category::Math => 400,
            Category::User => 800,
            Category::Internal => 900,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    // Syntax
    Invalid { what: &'static str, text: String },
    Missing { close: char, open: char },

    // Script
    NoValue { word: String },
    NeedValue { word: String },
    NotBound { word: String },
    ExpectArg { func: String, param: String, got: &'static str },
    NoArg { func: String, param: String },
    NoRefine { func: String, refine: String },
    InvalidArg { value: String },
    InvalidPath { path: String, part: String },
    BadMake { type_name: String, spec: String },
    NoLoop,
    NotInFunction,
    PastEnd,
    NotCallable { value: String },

    // Math
    ZeroDivide,
    Overflow,

    // Internal
    StackOverflow { depth: usize },
    StaleReference { what: &'static str },

    // User
    User { message: String },
}

impl ErrorKind {
    pub(crate) fn category(&self) -> Category {
        match self {
            Self::Invalid { .. } | Self::Missing { .. } => Category::Syntax,
            Self::ZeroDivide | Self::Overflow => Category::Math,
            Self::StackOverflow { .. } | Self::StaleReference { .. } => Category::Internal,
            Self::User { .. } => Category::User,
            _ => Category::Script,
        }
    }

    /// The `id` word of the error value.
    pub(crate) fn id(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "invalid",
            Self::Missing { .. } => "missing",
            Self::NoValue { .. } => "no-value",
            Self::NeedValue { .. } => "need-value",
            Self::NotBound { .. } => "not-bound",
            Self::ExpectArg { .. } => "expect-arg",
            Self::NoArg { .. } => "no-arg",
            Self::NoRefine { .. } => "no-refine",
            Self::InvalidArg { .. } => "invalid-arg",
            Self::InvalidPath { .. } => "invalid-path",
            Self::BadMake { .. } => "bad-make-arg",
            Self::NoLoop => "no-loop",
            Self::NotInFunction => "not-in-function",
            Self::PastEnd => "past-end",
            Self::NotCallable { .. } => "not-callable",
            Self::ZeroDivide => "zero-divide",
            Self::Overflow => "overflow",
            Self::StackOverflow { .. } => "stack-overflow",
            Self::StaleReference { .. } => "stale-reference",
            Self::User { .. } => "message",
        }
    }

    pub(crate) fn code(&self) -> i64 {
        let offset = match self {
            Self::Invalid { .. } | Self::NoValue { .. } | Self::ZeroDivide => 0,
            Self::Missing { .. } | Self::NeedValue { .. } | Self::Overflow => 1,
            Self::NotBound { .. } => 2,
            Self::ExpectArg { .. } => 3,
            Self::NoArg { .. } => 4,
            Self::NoRefine { .. } => 5,
            Self::InvalidArg { .. } => 6,
            Self::InvalidPath { .. } => 7,
            Self::BadMake { .. } => 8,
            Self::NoLoop => 10,
            Self::NotInFunction => 11,
            Self::PastEnd => 12,
            Self::NotCallable { .. } => 13,
            Self::StackOverflow { .. } | Self::User { .. } => 0,
            Self::StaleReference { .. } => 1,
        };
        self.category().base_code() + offset
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid { what, text } => write!(f, "invalid {what} -- {text}"),
            Self::Missing { close, open } => {
                write!(f, "missing {close} at end-of-script (opened by {open})")
            }
            Self::NoValue { word } => write!(f, "{word} has no value"),
            Self::NeedValue { word } => write!(f, "{word} needs a value"),
            Self::NotBound { word } => write!(f, "{word} word is not bound to a context"),
            Self::ExpectArg { func, param, got } => {
                write!(f, "{func} does not allow {got} for its {param} argument")
            }
            Self::NoArg { func, param } => write!(f, "{func} is missing its {param} argument"),
            Self::NoRefine { func, refine } => {
                write!(f, "{func} has no refinement called /{refine}")
            }
            Self::InvalidArg { value } => write!(f, "invalid argument: {value}"),
            Self::InvalidPath { path, part } => write!(f, "cannot access {part} in path {path}"),
            Self::BadMake { type_name, spec } => {
                write!(f, "cannot MAKE {type_name} from: {spec}")
            }
            Self::NoLoop => write!(f, "no loop to break"),
            Self::NotInFunction => write!(f, "return or exit not in function"),
            Self::PastEnd => write!(f, "out of range or past end"),
            Self::NotCallable { value } => write!(f, "{value} is not a function"),
            Self::ZeroDivide => write!(f, "attempt to divide by zero"),
            Self::Overflow => write!(f, "math or number overflow"),
            Self::StackOverflow { depth } => {
                write!(f, "stack overflow (evaluation depth limit {depth})")
            }
            Self::StaleReference { what } => {
                write!(f, "reference to a collected {what}")
            }
            Self::User { message } => f.write_str(message),
        }
    }
}

#[cold]
pub(crate) fn invalid(what: &'static str, text: impl Into<String>) -> ErrorKind {
    ErrorKind::Invalid {
        what,
        text: text.into(),
    }
}

#[cold]
pub(crate) fn missing(close: char, open: char) -> ErrorKind {
    ErrorKind::Missing { close, open }
}

#[cold]
pub(crate) fn no_value(word: &str) -> ErrorKind {
    ErrorKind::NoValue {
        word: word.to_owned(),
    }
}

#[cold]
pub(crate) fn need_value(word: &str) -> ErrorKind {
    ErrorKind::NeedValue {
        word: word.to_owned(),
    }
}

#[cold]
pub(crate) fn not_bound(word: &str) -> ErrorKind {
    ErrorKind::NotBound {
        word: word.to_owned(),
    }
}

#[cold]
pub(crate) fn expect_arg(func: &str, param: &str, got: &'static str) -> ErrorKind {
    ErrorKind::ExpectArg {
        func: func.to_owned(),
        param: param.to_owned(),
        got,
    }
}

#[cold]
pub(crate) fn no_arg(func: &str, param: &str) -> ErrorKind {
    ErrorKind::NoArg {
        func: func.to_owned(),
        param: param.to_owned(),
    }
}

#[cold]
pub(crate) fn no_refine(func: &str, refine: &str) -> ErrorKind {
    ErrorKind::NoRefine {
        func: func.to_owned(),
        refine: refine.to_owned(),
    }
}

#[cold]
pub(crate) fn invalid_arg(value: impl Into<String>) -> ErrorKind {
    ErrorKind::InvalidArg {
        value: value.into(),
    }
}

#[cold]
pub(crate) fn invalid_path(path: impl Into<String>, part: impl Into<String>) -> ErrorKind {
    ErrorKind::InvalidPath {
        path: path.into(),
        part: part.into(),
    }
}

#[cold]
pub(crate) fn bad_make(type_name: impl Into<String>, spec: impl Into<String>) -> ErrorKind {
    ErrorKind::BadMake {
        type_name: type_name.into(),
        spec: spec.into(),
    }
}

#[cold]
pub(crate) fn no_loop() -> ErrorKind {
    ErrorKind::NoLoop
}

#[cold]
pub(crate) fn not_in_function() -> ErrorKind {
    ErrorKind::NotInFunction
}

#[cold]
pub(crate) fn past_end() -> ErrorKind {
    ErrorKind::PastEnd
}

#[cold]
pub(crate) fn not_callable(value: impl Into<String>) -> ErrorKind {
    ErrorKind::NotCallable {
        value: value.into(),
    }
}

#[cold]
pub(crate) fn zero_divide() -> ErrorKind {
    ErrorKind::ZeroDivide
}

#[cold]
pub(crate) fn overflow() -> ErrorKind {
    ErrorKind::Overflow
}

#[cold]
pub(crate) fn stack_overflow(depth: usize) -> ErrorKind {
    ErrorKind::StackOverflow { depth }
}

#[cold]
pub(crate) fn stale(what: &'static str) -> ErrorKind {
    ErrorKind::StaleReference { what }
}

#[cold]
pub(crate) fn user(message: impl Into<String>) -> ErrorKind {
    ErrorKind::User {
        message: message.into(),
    }
}
