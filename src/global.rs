//! src/global.rs
//! The process-wide logger instance.

use std::sync::OnceLock;

use logging::LoggerConfig;

use crate::bootstrap;
use crate::logger::{InitError, Logger};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Installs the process-wide logger built from `config`.
///
/// Fails with [`InitError::AlreadyInitialized`] once a logger is installed,
/// whether by an earlier `init` or by [`global`]. The check happens before
/// the log directory or any file is touched.
pub fn init(config: LoggerConfig) -> Result<&'static Logger, InitError> {
    if is_initialized() {
        return Err(InitError::AlreadyInitialized);
    }
    install(Logger::from_config(config)?)
}

/// Resolves the configuration from the environment and installs the
/// process-wide logger.
pub fn init_from_env() -> Result<&'static Logger, InitError> {
    init(bootstrap::resolve_from_env()?)
}

/// Installs an already constructed logger as the process-wide instance.
pub fn install(logger: Logger) -> Result<&'static Logger, InitError> {
    GLOBAL
        .set(logger)
        .map_err(|_| InitError::AlreadyInitialized)?;
    GLOBAL.get().ok_or(InitError::AlreadyInitialized)
}

/// The process-wide logger, bootstrapped from the environment on first use.
///
/// Bootstrap never fails: an unreadable configuration falls back to the
/// built-in defaults and unopenable log files fall back to console output.
/// Both cases are reported through `tracing`.
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(|| {
        let config = bootstrap::resolve_from_env().unwrap_or_else(|error| {
            tracing::warn!(target: "duallog::bootstrap", %error, "using default log configuration");
            LoggerConfig::default()
        });
        bootstrap_logger(config)
    })
}

/// Reports whether the process-wide logger has been installed.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}

fn bootstrap_logger(config: LoggerConfig) -> Logger {
    match Logger::from_config(config.clone()) {
        Ok(logger) => logger,
        Err(error) => {
            tracing::warn!(
                target: "duallog::bootstrap",
                %error,
                "log files unavailable, logging to console only"
            );
            Logger::console_only(config).unwrap_or_else(|_| Logger::fallback())
        }
    }
}
