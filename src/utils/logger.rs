//! Structured logger handle.
//!
//! Each [`Logger`] owns its own `tracing` dispatcher: a JSON layer on stdout,
//! plus a JSON layer on the configured log file and on any extra writer. The
//! handle can be installed as the global default, but nothing here requires it.

use crate::config::logging::{LogConfig, LogOption};
use crate::domain::model::{DispatchMode, LogLevel};
use crate::domain::ports::KeyValueLogger;
use crate::utils::error::{SdkError, Result};
use std::backtrace::Backtrace;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::Dispatch;
use tracing_appender::rolling::{RollingFileAppender, RollingWriter, Rotation};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

/// Timestamp layout used by every output target.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Key used for a trailing value that has no key in a generic `log` call.
pub const BAD_KEY: &str = "!BADKEY";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
    level: LogLevel,
    mode: DispatchMode,
    stacktrace: bool,
    fields: Vec<(String, String)>,
    file: Option<FileSink>,
}

impl Logger {
    pub fn new(config: &LogConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Like [`Logger::new`], with `writer` as an additional output target.
    pub fn with_writer<W>(config: &LogConfig, writer: W) -> Result<Self>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        Self::build(config, Some(BoxMakeWriter::new(writer)))
    }

    pub fn from_env(option: Option<&LogOption>) -> Result<Self> {
        Self::new(&LogConfig::from_env(option))
    }

    fn build(config: &LogConfig, extra: Option<BoxMakeWriter>) -> Result<Self> {
        let file = config.file.as_deref().map(FileSink::open).transpose()?;

        let mut layers: Vec<BoxedLayer> = vec![json_layer(std::io::stdout, config.level)];
        if let Some(sink) = &file {
            layers.push(json_layer(sink.clone(), config.level));
        }
        if let Some(writer) = extra {
            layers.push(json_layer(writer, config.level));
        }

        let subscriber = Registry::default().with(layers);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
            level: config.level,
            mode: config.dispatch_mode,
            stacktrace: !config.disable_stacktrace,
            fields: Vec::new(),
            file,
        })
    }

    /// Makes this handle the process-wide `tracing` dispatcher.
    pub fn install_global(&self) -> Result<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone()).map_err(|e| {
            SdkError::LoggerError {
                message: e.to_string(),
            }
        })
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.mode
    }

    /// A derived logger that tags every event with `key`. The receiver is unchanged.
    pub fn with(&self, key: &str, value: impl fmt::Display) -> Self {
        let mut derived = self.clone();
        derived.fields.push((key.to_string(), value.to_string()));
        derived
    }

    pub fn debug(&self, message: &str, kv: &[(&str, &dyn fmt::Display)]) {
        self.emit(LogLevel::Debug, message, owned_pairs(kv));
    }

    pub fn info(&self, message: &str, kv: &[(&str, &dyn fmt::Display)]) {
        self.emit(LogLevel::Info, message, owned_pairs(kv));
    }

    pub fn warn(&self, message: &str, kv: &[(&str, &dyn fmt::Display)]) {
        self.emit(LogLevel::Warning, message, owned_pairs(kv));
    }

    pub fn error(&self, message: &str, kv: &[(&str, &dyn fmt::Display)]) {
        self.emit(LogLevel::Error, message, owned_pairs(kv));
    }

    /// Logged at error severity; never panics.
    pub fn dpanic(&self, message: &str, kv: &[(&str, &dyn fmt::Display)]) {
        self.emit(LogLevel::DPanic, message, owned_pairs(kv));
    }

    /// Logged at error severity; never panics.
    pub fn panic(&self, message: &str, kv: &[(&str, &dyn fmt::Display)]) {
        self.emit(LogLevel::Panic, message, owned_pairs(kv));
    }

    /// Logged at error severity; never exits the process.
    pub fn fatal(&self, message: &str, kv: &[(&str, &dyn fmt::Display)]) {
        self.emit(LogLevel::Fatal, message, owned_pairs(kv));
    }

    /// Best-effort sync of stdout and the log file.
    pub fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = file.make_writer().flush();
        }
        let _ = std::io::stdout().flush();
    }

    fn emit(&self, level: LogLevel, message: &str, kv: Vec<(String, String)>) {
        if level < self.level {
            return;
        }

        let rendered = self.render(kv);
        let captured = (self.stacktrace && level >= LogLevel::Error)
            .then(|| Backtrace::force_capture().to_string());

        let severity = level.as_str();
        let kv = rendered.as_deref();
        let stacktrace = captured.as_deref();

        tracing::dispatcher::with_default(&self.dispatch, || match level {
            LogLevel::Debug => tracing::debug!(severity, kv, stacktrace, "{}", message),
            LogLevel::Info => tracing::info!(severity, kv, stacktrace, "{}", message),
            LogLevel::Warning => tracing::warn!(severity, kv, stacktrace, "{}", message),
            _ => tracing::error!(severity, kv, stacktrace, "{}", message),
        });
    }

    fn render(&self, kv: Vec<(String, String)>) -> Option<String> {
        if self.fields.is_empty() && kv.is_empty() {
            return None;
        }
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .cloned()
            .chain(kv)
            .map(|(key, value)| (key, serde_json::Value::String(value)))
            .collect();
        Some(serde_json::Value::Object(map).to_string())
    }
}

impl KeyValueLogger for Logger {
    /// Pairs up `keyvals` and emits them with an empty message. In
    /// [`DispatchMode::Construction`] the severity is always the level the
    /// handle was built with; in [`DispatchMode::PerCall`] it comes from a
    /// `level` key, defaulting to info. Always returns `Ok`.
    fn log(&self, keyvals: &[&dyn fmt::Display]) -> Result<()> {
        let pairs: Vec<(String, String)> = keyvals
            .chunks(2)
            .map(|chunk| {
                if let [key, value] = chunk {
                    (key.to_string(), value.to_string())
                } else {
                    (BAD_KEY.to_string(), chunk[0].to_string())
                }
            })
            .collect();

        let level = match self.mode {
            DispatchMode::Construction => self.level,
            DispatchMode::PerCall => pairs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("level"))
                .and_then(|(_, value)| LogLevel::from_name(&value.to_ascii_lowercase()))
                .unwrap_or(LogLevel::Info),
        };

        self.emit(level, "", pairs);
        Ok(())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("mode", &self.mode)
            .field("stacktrace", &self.stacktrace)
            .field("fields", &self.fields)
            .field("file", &self.file.is_some())
            .finish()
    }
}

/// Flushes `logger` if there is one.
pub fn flush_logger(logger: Option<&Logger>) {
    if let Some(logger) = logger {
        logger.flush();
    }
}

/// Displays a duration as fractional milliseconds, the encoding used for
/// every duration field the SDK logs.
#[derive(Debug, Clone, Copy)]
pub struct Millis(pub Duration);

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0.as_secs_f64() * 1000.0)
    }
}

fn owned_pairs(kv: &[(&str, &dyn fmt::Display)]) -> Vec<(String, String)> {
    kv.iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn json_layer<W>(writer: W, level: LogLevel) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(false)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_writer(writer)
        .with_filter(level.level_filter())
        .boxed()
}

/// Append-only log file shared by every clone of a handle.
#[derive(Clone, Debug)]
struct FileSink(Arc<RollingFileAppender>);

impl FileSink {
    fn open(path: &Path) -> Result<Self> {
        let directory = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| SdkError::LoggerError {
            message: format!("log file path has no file name: {}", path.display()),
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name.to_string_lossy())
            .build(directory)
            .map_err(|e| SdkError::LoggerError {
                message: format!("cannot open log file {}: {}", path.display(), e),
            })?;

        Ok(Self(Arc::new(appender)))
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = RollingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        MakeWriter::make_writer(&*self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_display() {
        assert_eq!(Millis(Duration::from_micros(1500)).to_string(), "1.500");
        assert_eq!(Millis(Duration::from_secs(2)).to_string(), "2000.000");
    }

    #[test]
    fn test_with_does_not_touch_parent() {
        let base = Logger::new(&LogConfig::default()).unwrap();
        let derived = base.with("method", "insert_one");

        assert!(base.fields.is_empty());
        assert_eq!(derived.fields, vec![("method".to_string(), "insert_one".to_string())]);
    }

    #[test]
    fn test_render_merges_tags_and_call_fields() {
        let logger = Logger::new(&LogConfig::default())
            .unwrap()
            .with("method", "count_documents");
        let rendered = logger
            .render(vec![("collection".to_string(), "users".to_string())])
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["method"], "count_documents");
        assert_eq!(parsed["collection"], "users");
    }

    #[test]
    fn test_render_empty_is_none() {
        let logger = Logger::new(&LogConfig::default()).unwrap();
        assert!(logger.render(Vec::new()).is_none());
    }

    #[test]
    fn test_flush_on_missing_logger_is_noop() {
        flush_logger(None);
    }
}
