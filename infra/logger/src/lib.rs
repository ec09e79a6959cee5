//! # Logger
//!
//! One place to stand up the global tracing subscriber: a compact console
//! layer, an optional rolling file layer with non-blocking I/O, and
//! environment-driven filtering on top of a programmatic default.
//!
//! ```rust
//! # use rhub_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder()
//!     .name("reclaim-hub")
//!     .level(LevelFilter::DEBUG)
//!     .env_filter("rhub=debug,hyper=info")
//!     .init()
//!     .unwrap();
//! ```
//!
//! The returned [`Logger`] handle owns the file writer's worker guard; keep
//! it alive for the lifetime of the process or buffered lines are lost.

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Rolling file output settings, present once a path has been chosen.
#[derive(Debug)]
struct FileOutput {
    path: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl FileOutput {
    fn new(path: PathBuf) -> Self {
        Self { path, rotation: Rotation::DAILY, max_files: DEFAULT_MAX_FILES, json: false }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);
#[derive(Debug)]
pub struct NoFile;
#[derive(Debug)]
pub struct WithFile;

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}
impl Sealed for NoFile {}
impl Sealed for WithFile {}

/// Configures and installs the global tracing subscriber.
///
/// The typestate parameters require a name before `init` and gate the
/// file-only settings behind a chosen path.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName, F: Sealed = NoFile> {
    name: N,
    level: LevelFilter,
    console: bool,
    filter: Option<String>,
    file: Option<FileOutput>,
    _file: PhantomData<F>,
}

impl<F: Sealed> LoggerBuilder<NoName, F> {
    /// Names the logger; rolling files are prefixed with it
    /// (e.g., `reclaim-hub.2026-08-29.log`).
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName, F> {
        LoggerBuilder {
            name: WithName(name.into()),
            level: self.level,
            console: self.console,
            filter: self.filter,
            file: self.file,
            _file: PhantomData,
        }
    }
}

impl<F: Sealed> LoggerBuilder<WithName, F> {
    /// Minimum level emitted when no filter directive matches.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Programmatic filter directives (e.g., `rhub=debug,hyper=info`).
    ///
    /// `RUST_LOG` is not consulted when this is set; an unparsable filter
    /// fails [`LoggerBuilder::init`].
    #[must_use]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Toggles the console layer. On by default.
    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Enables rolling file output under `path`, unlocking the file-only
    /// settings.
    pub fn path(self, path: impl Into<PathBuf>) -> LoggerBuilder<WithName, WithFile> {
        LoggerBuilder {
            name: self.name,
            level: self.level,
            console: self.console,
            filter: self.filter,
            file: Some(FileOutput::new(path.into())),
            _file: PhantomData,
        }
    }

    /// Installs the subscriber globally and returns the [`Logger`] handle.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, a zero
    ///   `max_files`, an unparsable filter, or no enabled layer.
    /// * [`LoggerError::Appender`] when the rolling file appender cannot be
    ///   built.
    /// * [`LoggerError::Subscriber`] when a global subscriber is already set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.name.0.trim();
        if name.is_empty() {
            return Err(invalid("Logger name cannot be empty"));
        }
        if self.file.as_ref().is_some_and(|f| f.max_files == 0) {
            return Err(invalid("max_files must be greater than zero"));
        }
        if !self.console && self.file.is_none() {
            return Err(invalid("No logging layers enabled. Enable console or file output."));
        }

        let env_filter = match &self.filter {
            Some(directives) => EnvFilter::builder()
                .with_default_directive(self.level.into())
                .parse(directives)
                .map_err(|e| invalid(format!("Invalid env filter '{directives}': {e}")))?,
            None => EnvFilter::builder()
                .with_default_directive(self.level.into())
                .from_env_lossy(),
        };

        let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);
        if self.console {
            layers.push(fmt::layer().compact().with_ansi(true).boxed());
        }

        let guard = match self.file {
            Some(output) => {
                let (layer, guard) = build_file_layer(name, output)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(layers)
            .try_init()?;

        Ok(Logger { guard })
    }
}

type FilteredRegistry =
    tracing_subscriber::layer::Layered<EnvFilter, tracing_subscriber::Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

fn build_file_layer(
    name: &str,
    output: FileOutput,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    fs::create_dir_all(&output.path).map_err(|e| LoggerError::Internal {
        message: e.to_string().into(),
        context: Some(format!("Failed to create path: {}", output.path.display()).into()),
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(output.rotation)
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(output.max_files)
        .build(&output.path)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().with_writer(writer).with_ansi(false);

    let boxed = if output.json { layer.json().boxed() } else { layer.boxed() };
    Ok((boxed, guard))
}

impl LoggerBuilder<WithName, WithFile> {
    /// How many rolled files to keep before the oldest is deleted.
    #[must_use]
    pub fn max_files(mut self, max: usize) -> Self {
        if let Some(file) = &mut self.file {
            file.max_files = max;
        }
        self
    }

    /// File rotation cadence. Daily by default.
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = &mut self.file {
            file.rotation = rotation;
        }
        self
    }

    /// Switches the file layer to JSON lines.
    #[must_use]
    pub fn json(mut self) -> Self {
        if let Some(file) = &mut self.file {
            file.json = true;
        }
        self
    }
}

fn invalid(message: impl Into<std::borrow::Cow<'static, str>>) -> LoggerError {
    LoggerError::InvalidConfiguration { message: message.into(), context: None }
}

/// Handle to the installed logging system.
///
/// Holds the file writer's background guard; drop only at process shutdown.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Starts a new [`LoggerBuilder`] with console output enabled and level
    /// `INFO`.
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            name: NoName,
            level: LevelFilter::INFO,
            console: true,
            filter: None,
            file: None,
            _file: PhantomData,
        }
    }

    /// The file writer's worker guard, when file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}
