//! Diagnostic log setup.
//!
//! Log records go to stderr so rendered output on stdout stays clean. The
//! level comes from `-v`/`-q` unless `SLIDEDECK_LOG_LEVEL` names a filter.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::args::{Cli, ColorChoice};

/// Environment variable holding a filter that replaces the flag-derived level.
pub const LOG_LEVEL_ENV: &str = "SLIDEDECK_LOG_LEVEL";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines, colored when the terminal allows it.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Resolved logging options for one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    format: LogFormat,
    verbosity: u8,
    quiet: bool,
    color: ColorChoice,
}

impl LogSettings {
    /// Collects the logging flags from parsed arguments.
    #[must_use]
    pub const fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.log_format,
            verbosity: cli.verbose,
            quiet: cli.quiet,
            color: cli.color,
        }
    }

    /// Level implied by the flags alone.
    #[must_use]
    pub const fn level(&self) -> &'static str {
        if self.quiet {
            return "off";
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Builds the filter, preferring a parseable `env_override`.
    ///
    /// `--quiet` wins over the environment.
    #[must_use]
    pub fn filter(&self, env_override: Option<&str>) -> EnvFilter {
        if self.quiet {
            return EnvFilter::new("off");
        }
        env_override
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(self.level()))
    }

    /// Whether ANSI escapes should be written.
    #[must_use]
    pub const fn ansi(&self, stderr_is_terminal: bool, no_color: bool) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => stderr_is_terminal && !no_color,
        }
    }

    fn output_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let with_target = self.verbosity >= 2;
        match self.format {
            LogFormat::Human => fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(with_target)
                .with_ansi(self.ansi(
                    std::io::stderr().is_terminal(),
                    std::env::var_os("NO_COLOR").is_some(),
                ))
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(with_target)
                .boxed(),
        }
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error when a global subscriber is already set.
    pub fn install(&self) -> Result<(), TryInitError> {
        let env_override = std::env::var(LOG_LEVEL_ENV).ok();
        let filter = self.filter(env_override.as_deref());
        tracing_subscriber::registry()
            .with(self.output_layer().with_filter(filter))
            .try_init()
    }
}
