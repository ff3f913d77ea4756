use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::level_filters::LevelFilter;
use tracing::Level;

/// Severity levels understood by the SDK logger, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    #[default]
    Debug,
    Info,
    Warning,
    Error,
    DPanic,
    Panic,
    Fatal,
}

impl LogLevel {
    /// Strict lookup; `None` for anything outside the known names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            "dpanic" => Some(LogLevel::DPanic),
            "panic" => Some(LogLevel::Panic),
            "fatal" => Some(LogLevel::Fatal),
            _ => None,
        }
    }

    /// Permissive lookup used for configuration: unknown names resolve to `Debug`.
    pub fn parse(name: &str) -> Self {
        Self::from_name(name).unwrap_or(LogLevel::Debug)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
            LogLevel::DPanic => "dpanic",
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
        }
    }

    /// The `tracing` level an event of this severity is emitted at.
    pub fn tracing_level(&self) -> Level {
        match self {
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warning => Level::WARN,
            _ => Level::ERROR,
        }
    }

    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_level(self.tracing_level())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How generic key-value dispatch picks a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Severity comes from a `level` key in each call, `info` when absent.
    #[default]
    PerCall,
    /// Every call is routed by the level the logger was built with.
    Construction,
}

impl DispatchMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "per_call" | "percall" | "per-call" => Some(DispatchMode::PerCall),
            "construction" | "compat" => Some(DispatchMode::Construction),
            _ => None,
        }
    }
}

/// Relational engines the client factory can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    MySql,
}

impl Engine {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mysql" => Some(Engine::MySql),
            _ => None,
        }
    }
}
