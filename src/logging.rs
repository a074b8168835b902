//! Logging configuration and subscriber construction.
//!
//! The orchestrator never installs a global subscriber on its own. Callers
//! either hand it a [`Dispatch`] built here or call [`LoggingConfig::init`]
//! once at process start.

use serde::{Deserialize, Serialize};
use tracing::Dispatch;
use tracing::dispatcher::SetGlobalDefaultError;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `info` or
    /// `ormgate=debug`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Builds a dispatch writing to standard output.
    #[must_use]
    pub fn dispatch(&self) -> Dispatch {
        self.dispatch_to(std::io::stdout)
    }

    /// Builds a dispatch writing to `writer`, with ANSI colours disabled.
    #[must_use]
    pub fn dispatch_to<W>(&self, writer: W) -> Dispatch
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = self.filter();
        match self.format {
            LogFormat::Json => Dispatch::new(
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(writer)
                    .finish(),
            ),
            LogFormat::Pretty => Dispatch::new(
                fmt()
                    .pretty()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(writer)
                    .finish(),
            ),
        }
    }

    /// Installs [`Self::dispatch`] as the process-wide default.
    ///
    /// # Errors
    ///
    /// Returns [`SetGlobalDefaultError`] when a global subscriber is already
    /// installed.
    pub fn init(&self) -> Result<(), SetGlobalDefaultError> {
        tracing::dispatcher::set_global_default(self.dispatch())
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}
