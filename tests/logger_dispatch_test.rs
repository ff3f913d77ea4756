use anyhow::Result;
use sdk_common::{DispatchMode, KeyValueLogger, LogConfig, LogLevel, Logger};
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// 收集日誌輸出的記憶體 writer
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn lines(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn config(level: LogLevel, mode: DispatchMode) -> LogConfig {
    LogConfig {
        disable_stacktrace: true,
        level,
        file: None,
        dispatch_mode: mode,
    }
}

fn kv(line: &Value) -> Value {
    serde_json::from_str(line["kv"].as_str().unwrap()).unwrap()
}

#[test]
fn test_construction_mode_routes_by_configured_level() -> Result<()> {
    let capture = Capture::default();
    let logger = Logger::with_writer(
        &config(LogLevel::Error, DispatchMode::Construction),
        capture.clone(),
    )?;

    logger.log(&[&"level", &"debug", &"msg", &"hello"])?;

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["level"], "ERROR");
    assert_eq!(lines[0]["severity"], "error");
    assert_eq!(kv(&lines[0])["msg"], "hello");
    Ok(())
}

#[test]
fn test_per_call_mode_honours_level_key() -> Result<()> {
    let capture = Capture::default();
    let logger = Logger::with_writer(
        &config(LogLevel::Debug, DispatchMode::PerCall),
        capture.clone(),
    )?;

    logger.log(&[&"level", &"warning", &"event", &"retry"])?;
    logger.log(&[&"event", &"plain"])?;

    let lines = capture.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["severity"], "warning");
    assert_eq!(lines[0]["level"], "WARN");
    assert_eq!(lines[1]["severity"], "info");
    Ok(())
}

#[test]
fn test_odd_keyvals_get_bad_key() -> Result<()> {
    let capture = Capture::default();
    let logger = Logger::with_writer(&LogConfig::default(), capture.clone())?;

    logger.log(&[&"user", &"alice", &42])?;

    let lines = capture.lines();
    assert_eq!(kv(&lines[0])["!BADKEY"], "42");
    Ok(())
}

#[test]
fn test_events_below_level_are_dropped() -> Result<()> {
    let capture = Capture::default();
    let logger = Logger::with_writer(
        &config(LogLevel::Warning, DispatchMode::PerCall),
        capture.clone(),
    )?;

    logger.debug("hidden", &[]);
    logger.info("hidden", &[]);
    logger.warn("shown", &[("attempt", &2)]);

    let lines = capture.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["message"], "shown");
    assert_eq!(kv(&lines[0])["attempt"], "2");
    assert!(lines[0].get("timestamp").is_some());
    Ok(())
}

#[test]
fn test_terminal_levels_do_not_abort() -> Result<()> {
    let capture = Capture::default();
    let logger = Logger::with_writer(&LogConfig::default(), capture.clone())?;

    logger.dpanic("dpanic", &[]);
    logger.panic("panic", &[]);
    logger.fatal("fatal", &[]);

    let severities: Vec<Value> = capture
        .lines()
        .iter()
        .map(|line| line["severity"].clone())
        .collect();
    assert_eq!(severities, vec!["dpanic", "panic", "fatal"]);
    Ok(())
}

#[test]
fn test_stacktrace_attached_to_errors_when_enabled() -> Result<()> {
    let capture = Capture::default();
    let mut enabled = config(LogLevel::Debug, DispatchMode::PerCall);
    enabled.disable_stacktrace = false;
    let logger = Logger::with_writer(&enabled, capture.clone())?;

    logger.info("no trace", &[]);
    logger.error("with trace", &[]);

    let lines = capture.lines();
    assert!(lines[0].get("stacktrace").is_none());
    assert!(lines[1]["stacktrace"].is_string());
    Ok(())
}

#[test]
fn test_derived_tags_do_not_leak_into_parent() -> Result<()> {
    let capture = Capture::default();
    let base = Logger::with_writer(&LogConfig::default(), capture.clone())?;
    let derived = base.with("method", "find_one");

    derived.info("tagged", &[]);
    base.info("untagged", &[]);

    let lines = capture.lines();
    assert_eq!(kv(&lines[0])["method"], "find_one");
    assert!(lines[1].get("kv").is_none());
    Ok(())
}

#[test]
fn test_file_output() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("sdk.log");
    let logger = Logger::new(&LogConfig {
        file: Some(path.clone()),
        ..config(LogLevel::Info, DispatchMode::PerCall)
    })?;

    logger.info("written to file", &[("order", &"A-1")]);
    logger.flush();

    let content = std::fs::read_to_string(&path)?;
    let line: Value = serde_json::from_str(content.lines().next().unwrap())?;
    assert_eq!(line["message"], "written to file");
    assert_eq!(line["severity"], "info");
    Ok(())
}
