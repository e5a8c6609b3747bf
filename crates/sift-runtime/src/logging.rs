//! Logging setup built on `tracing-subscriber`.
//!
//! ```rust,ignore
//! use sift_runtime::{config::load_config, logging};
//!
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//! ```
//!
//! Or without a config file:
//!
//! ```rust,ignore
//! use sift_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .directive("sift_filters=trace")
//!     .init();
//! ```
//!
//! `RUST_LOG`, when set, replaces the configured level. Per-module directives
//! are applied on top of either.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{Level, Subscriber, warn};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{LogFormat, LogOutput, LoggingConfig};

/// Installs the global subscriber described by `config`.
///
/// Does nothing if one is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    LoggingBuilder::from_config(config).init();
}

/// Builds and installs the global `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    level: Level,
    directives: Vec<String>,
    format: LogFormat,
    output: LogOutput,
    file: Option<PathBuf>,
    target: bool,
    thread_ids: bool,
    file_location: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Compact lines on stdout at `info`, with targets.
    pub fn new() -> Self {
        Self {
            level: Level::INFO,
            directives: Vec::new(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file: None,
            target: true,
            thread_ids: false,
            file_location: false,
        }
    }

    /// Mirrors the `[logging]` section.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let directives = config
            .filters
            .iter()
            .map(|(module, level)| format!("{module}={level}"))
            .collect();

        Self {
            level: config.level.to_tracing_level(),
            directives,
            format: config.format,
            output: config.output,
            file: config.file_path.clone(),
            thread_ids: config.thread_ids,
            file_location: config.file_location,
            ..Self::new()
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Adds a filter directive such as `sift_filters=trace`. Directives that
    /// do not parse are ignored.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Writes to `path` instead of a standard stream.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = LogOutput::File;
        self.file = Some(path.into());
        self
    }

    /// Shows the module path of each event.
    pub fn target(mut self, enabled: bool) -> Self {
        self.target = enabled;
        self
    }

    pub fn thread_ids(mut self, enabled: bool) -> Self {
        self.thread_ids = enabled;
        self
    }

    /// Shows the source file and line of each event.
    pub fn file_location(mut self, enabled: bool) -> Self {
        self.file_location = enabled;
        self
    }

    /// Installs the subscriber, ignoring an already installed one.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let (subscriber, stdout_fallback) = self.subscriber();
        subscriber.try_init()?;
        self.report_fallbacks(stdout_fallback);
        Ok(())
    }

    /// Runs `f` with this subscriber as the current thread's default,
    /// without installing anything globally.
    ///
    /// Useful for logging what happens before the real configuration is
    /// known, such as loading that configuration.
    pub fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        let (subscriber, stdout_fallback) = self.subscriber();
        tracing::subscriber::with_default(subscriber, || {
            self.report_fallbacks(stdout_fallback);
            f()
        })
    }

    fn subscriber(&self) -> (impl Subscriber + Send + Sync + 'static, bool) {
        let (writer, stdout_fallback) = self.writer();
        let subscriber = tracing_subscriber::registry()
            .with(self.fmt_layer(writer))
            .with(self.env_filter());
        (subscriber, stdout_fallback)
    }

    fn report_fallbacks(&self, stdout_fallback: bool) {
        if stdout_fallback {
            warn!("Log output is `file` but no `file_path` is set, logging to stdout");
        }
        #[cfg(not(feature = "json-log"))]
        if self.format == LogFormat::Json {
            warn!("JSON logs need the `json-log` feature, using the full format");
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.level).into())
            .from_env_lossy();

        self.directives
            .iter()
            .filter_map(|directive| directive.parse::<Directive>().ok())
            .fold(filter, EnvFilter::add_directive)
    }

    /// Returns the writer and whether a file output fell back to stdout.
    fn writer(&self) -> (BoxMakeWriter, bool) {
        match (self.output, self.file.as_deref()) {
            (LogOutput::Stdout, _) => (BoxMakeWriter::new(std::io::stdout), false),
            (LogOutput::Stderr, _) => (BoxMakeWriter::new(std::io::stderr), false),
            (LogOutput::File, Some(path)) => {
                let dir = path
                    .parent()
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let name = path.file_name().unwrap_or_else(|| OsStr::new("sift.log"));
                let appender = tracing_appender::rolling::never(dir, name);
                (BoxMakeWriter::new(appender), false)
            }
            (LogOutput::File, None) => (BoxMakeWriter::new(std::io::stdout), true),
        }
    }

    fn fmt_layer(&self, writer: BoxMakeWriter) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_target(self.target)
            .with_thread_ids(self.thread_ids)
            .with_file(self.file_location)
            .with_line_number(self.file_location);

        match self.format {
            LogFormat::Compact => layer.compact().boxed(),
            LogFormat::Pretty => layer.pretty().boxed(),
            #[cfg(feature = "json-log")]
            LogFormat::Json => layer.json().boxed(),
            #[cfg(not(feature = "json-log"))]
            LogFormat::Json => layer.boxed(),
            LogFormat::Full => layer.boxed(),
        }
    }
}
