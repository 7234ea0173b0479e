//! Logging configuration and setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. [`setup::init_logging`] installs the one the
//! `case-guard` binary uses.

use tracing::Level;

/// Controls how much the scanner logs while it runs.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Base log level for scanner components
    pub base_level: Level,
    /// Whether to log each validator's outcome
    pub log_rule_details: bool,
    /// Whether to log file loading
    pub log_data_operations: bool,
    /// Maximum length for logged field values
    pub max_field_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            base_level: Level::INFO,
            log_rule_details: false,
            log_data_operations: true,
            max_field_length: 256,
        }
    }
}

impl LogConfig {
    /// Logs every validator and loader step.
    pub fn verbose() -> Self {
        Self {
            base_level: Level::DEBUG,
            log_rule_details: true,
            log_data_operations: true,
            max_field_length: 1024,
        }
    }

    /// Logs warnings only.
    pub fn production() -> Self {
        Self {
            base_level: Level::WARN,
            log_rule_details: false,
            log_data_operations: false,
            max_field_length: 128,
        }
    }

    /// The default configuration.
    pub fn balanced() -> Self {
        Self::default()
    }

    /// Returns true if debug events are wanted.
    pub fn debug_enabled(&self) -> bool {
        self.base_level >= Level::DEBUG
    }
}

/// Debug logging that is skipped unless the config asks for debug output.
#[macro_export]
macro_rules! perf_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.debug_enabled() {
            tracing::debug!($($arg)*);
        }
    };
}

/// Per-validator logging, gated on [`LogConfig::log_rule_details`].
#[macro_export]
macro_rules! log_rule {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_rule_details {
            tracing::debug!($($arg)*);
        }
    };
}

/// Loader logging, gated on [`LogConfig::log_data_operations`].
#[macro_export]
macro_rules! log_data_op {
    ($config:expr, $($arg:tt)*) => {
        if $config.log_data_operations {
            tracing::info!($($arg)*);
        }
    };
}

/// Truncates a value to at most `max_length` characters for logging.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    match value.char_indices().nth(max_length) {
        None => value.to_string(),
        Some((cut, _)) => format!("{}...(truncated)", &value[..cut]),
    }
}

/// Subscriber installation for applications.
pub mod setup {
    use crate::prelude::*;
    use tracing::Level;

    /// Subscriber settings.
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        /// Log level for everything outside this crate
        pub level: Level,
        /// Log level for `case_guard` targets
        pub crate_level: Level,
        /// Whether to emit JSON lines instead of human-readable text
        pub json_format: bool,
        /// Full filter directive; replaces `level` and `crate_level` when set
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::WARN,
                crate_level: Level::WARN,
                json_format: false,
                env_filter: None,
            }
        }
    }

    impl LoggingConfig {
        /// Debug output for this crate, human-readable.
        pub fn development() -> Self {
            Self {
                level: Level::INFO,
                crate_level: Level::DEBUG,
                json_format: false,
                env_filter: None,
            }
        }

        /// JSON lines at info level, for log collectors.
        pub fn structured() -> Self {
            Self {
                level: Level::INFO,
                crate_level: Level::INFO,
                json_format: true,
                env_filter: None,
            }
        }

        /// Sets the level for other crates.
        pub fn with_level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Sets the level for this crate.
        pub fn with_crate_level(mut self, level: Level) -> Self {
            self.crate_level = level;
            self
        }

        /// Sets whether to use JSON output.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Uses `filter` as the whole directive.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter directive.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(filter) => filter.clone(),
                None => format!(
                    "{},case_guard={}",
                    self.level.as_str().to_lowercase(),
                    self.crate_level.as_str().to_lowercase()
                ),
            }
        }
    }

    /// Installs a global subscriber writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use case_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::development().with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<()> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.env_filter()));

        let fmt_layer = if config.json_format {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .boxed()
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| CaseGuardError::Internal(format!("Failed to install logger: {e}")))
    }
}
