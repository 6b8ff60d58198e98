//! Destination for `print` output.
//!
//! Engines write through a shared handler so that embedders (and tests) can
//! capture what interpreter code prints instead of letting it reach stdout.

use std::sync::Arc;

use parking_lot::Mutex;

/// Where interpreter output goes.
pub enum PrintHandler {
    /// Write to the process stdout.
    Stdout,
    /// Accumulate into an in-memory buffer.
    Buffer(Mutex<String>),
    /// Drop everything.
    Silent,
}

impl PrintHandler {
    pub fn buffer() -> Self {
        PrintHandler::Buffer(Mutex::new(String::new()))
    }

    /// Print a line (with newline).
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout => println!("{msg}"),
            Self::Buffer(buf) => {
                let mut buf = buf.lock();
                buf.push_str(msg);
                buf.push('\n');
            }
            Self::Silent => {}
        }
    }

    /// Print without newline.
    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout => print!("{msg}"),
            Self::Buffer(buf) => buf.lock().push_str(msg),
            Self::Silent => {}
        }
    }

    /// Captured output so far. Empty for handlers that don't capture.
    pub fn output(&self) -> String {
        match self {
            Self::Buffer(buf) => buf.lock().clone(),
            Self::Stdout | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(buf) = self {
            buf.lock().clear();
        }
    }
}

impl std::fmt::Debug for PrintHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdout => f.write_str("Stdout"),
            Self::Buffer(_) => f.write_str("Buffer"),
            Self::Silent => f.write_str("Silent"),
        }
    }
}

pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

/// A capturing handler; read it back with [`PrintHandler::output`].
pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::buffer())
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
