use super::Resolver;
use crate::domain::model::{DispatchMode, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Explicit logger options. Empty or absent fields fall back to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogOption {
    pub disable_stacktrace: Option<bool>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
    pub dispatch_mode: Option<DispatchMode>,
}

/// Resolved logger configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub disable_stacktrace: bool,
    pub level: LogLevel,
    pub file: Option<PathBuf>,
    pub dispatch_mode: DispatchMode,
}

impl LogConfig {
    pub fn resolve(option: Option<&LogOption>, resolver: &Resolver) -> Self {
        let option = option.cloned().unwrap_or_default();

        // 只有明確給定時才覆寫，false 也算
        let disable_stacktrace = option
            .disable_stacktrace
            .unwrap_or_else(|| resolver.get_bool("LOG_DISABLE_STACKTRACE"));

        let level = option
            .log_level
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| resolver.get_first_string(&["LOG_LEVEL", "logLevel"]));

        let file = option
            .log_file
            .filter(|file| !file.is_empty())
            .unwrap_or_else(|| resolver.get_first_string(&["LOG_FILE", "logFile"]));

        let dispatch_mode = option.dispatch_mode.unwrap_or_else(|| {
            DispatchMode::parse(&resolver.get_string("LOG_DISPATCH_MODE")).unwrap_or_default()
        });

        Self {
            disable_stacktrace,
            level: LogLevel::parse(&level),
            file: (!file.is_empty()).then(|| PathBuf::from(file)),
            dispatch_mode,
        }
    }

    pub fn from_env(option: Option<&LogOption>) -> Self {
        Self::resolve(option, &Resolver::from_env())
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }
}
