//! Engine configuration.

use std::path::PathBuf;

use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Allocations between automatic collections when nothing else is configured.
pub const DEFAULT_GC_THRESHOLD: usize = 4096;

/// Settings a backend reads when it is created and initialized.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Directory reported to interpreter code as the home directory.
    pub home_dir: Option<PathBuf>,
    /// Suppress the startup banner and informational output.
    pub quiet: bool,
    /// Emit a `trace!` event for every evaluation step.
    pub trace: bool,
    /// Series/frame allocations between automatic collections.
    pub gc_threshold: usize,
    /// Maximum nesting of evaluation before a stack-overflow error.
    /// `None` relies on stack growth alone.
    pub max_depth: Option<usize>,
    pub print: SharedPrintHandler,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            home_dir: None,
            quiet: true,
            trace: false,
            gc_threshold: DEFAULT_GC_THRESHOLD,
            max_depth: Some(1024),
            print: stdout_handler(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `REN_HOME`, `REN_GC_THRESHOLD`, `REN_MAX_DEPTH`
    /// and `REN_TRACE`. Unparseable numbers are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(home) = std::env::var_os("REN_HOME") {
            config.home_dir = Some(PathBuf::from(home));
        }
        if let Some(n) = env_usize("REN_GC_THRESHOLD") {
            config.gc_threshold = n.max(1);
        }
        if let Ok(depth) = std::env::var("REN_MAX_DEPTH") {
            if depth.trim() == "0" {
                config.max_depth = None;
            } else if let Ok(n) = depth.trim().parse() {
                config.max_depth = Some(n);
            }
        }
        if let Ok(trace) = std::env::var("REN_TRACE") {
            config.trace = matches!(trace.trim(), "1" | "true" | "yes" | "on");
        }
        config
    }

    #[must_use]
    pub fn home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    #[must_use]
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    #[must_use]
    pub fn gc_threshold(mut self, threshold: usize) -> Self {
        self.gc_threshold = threshold.max(1);
        self
    }

    #[must_use]
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print = handler;
        self
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = EngineConfig::new()
            .gc_threshold(0)
            .max_depth(None)
            .quiet(false)
            .home_dir("/tmp/ren");
        assert_eq!(config.gc_threshold, 1);
        assert_eq!(config.max_depth, None);
        assert!(!config.quiet);
        assert_eq!(config.home_dir, Some(PathBuf::from("/tmp/ren")));
    }
}
