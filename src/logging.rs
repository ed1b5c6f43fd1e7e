//! Engine log output.
//!
//! The `log` facade is installed once at startup with a [`Logger`] writing to
//! stderr.  Tests build their own `Logger` around an in-memory writer.

use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Target used for text printed by scripts.
pub const LUA_TARGET: &str = "te::lua";

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RED: &str = "\x1b[31m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_MAGENTA: &str = "\x1b[35m";
const ANSI_CYAN: &str = "\x1b[36m";

pub struct Logger {
    level: LevelFilter,
    color: bool,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Logger {
    pub fn new(level: LevelFilter, color: bool, sink: Box<dyn Write + Send>) -> Self {
        Self { level, color, sink: Mutex::new(sink) }
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Dependencies only get through for warnings and errors.
        is_engine_target(metadata.target()) || metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record, self.color);
        if let Ok(mut sink) = self.sink.lock() {
            let _ = writeln!(sink, "{line}");
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}

fn is_engine_target(target: &str) -> bool {
    target == "te" || target.starts_with("te::")
}

/// `src/file.rs:12 [te::warn] message`, with ANSI styling when `color` is set.
pub fn format_record(record: &Record, color: bool) -> String {
    let file = record.file().unwrap_or("?");
    let line = record.line().unwrap_or(0);
    let (level_color, level_name) = match record.level() {
        Level::Error => (ANSI_RED, "error"),
        Level::Warn => (ANSI_YELLOW, "warn"),
        Level::Info => (ANSI_GREEN, "info"),
        Level::Debug => (ANSI_CYAN, "debug"),
        Level::Trace => (ANSI_MAGENTA, "trace"),
    };

    if color {
        format!(
            "{ANSI_DIM}{file}:{line} [{ANSI_RESET}te::{level_color}{level_name}{ANSI_RESET}{ANSI_DIM}]{ANSI_RESET} {}",
            record.args()
        )
    } else {
        format!("{file}:{line} [te::{level_name}] {}", record.args())
    }
}

/// Install the stderr logger as the process-wide `log` backend.
pub fn initialize(level: LevelFilter) -> Result<(), SetLoggerError> {
    let color = io::stderr().is_terminal();
    let logger = Logger::new(level, color, Box::new(io::stderr()));
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Writer that keeps everything in a shared buffer.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn record<'a>(level: Level, target: &'a str, args: std::fmt::Arguments<'a>) -> Record<'a> {
        Record::builder()
            .level(level)
            .target(target)
            .file(Some("src/script/mod.rs"))
            .line(Some(42))
            .args(args)
            .build()
    }

    #[test]
    fn plain_format_has_location_and_level() {
        let line = format_record(&record(Level::Warn, "te::script", format_args!("unknown key: foo")), false);
        assert_eq!(line, "src/script/mod.rs:42 [te::warn] unknown key: foo");
    }

    #[test]
    fn colored_format_wraps_level_in_escape_codes() {
        let line = format_record(&record(Level::Error, "te", format_args!("boom")), true);
        assert!(line.contains(ANSI_RED));
        assert!(line.contains("error"));
        assert!(line.ends_with(" boom"));
    }

    #[test]
    fn logger_writes_enabled_records_to_sink() {
        let capture = Capture::default();
        let logger = Logger::new(LevelFilter::Info, false, Box::new(capture.clone()));
        logger.log(&record(Level::Info, "te::engine", format_args!("hello")));
        logger.log(&record(Level::Debug, "te::engine", format_args!("hidden")));
        let text = capture.text();
        assert!(text.contains("hello"));
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn dependency_chatter_is_filtered_below_warn() {
        let capture = Capture::default();
        let logger = Logger::new(LevelFilter::Trace, false, Box::new(capture.clone()));
        logger.log(&record(Level::Info, "wgpu_core::device", format_args!("noise")));
        logger.log(&record(Level::Warn, "wgpu_core::device", format_args!("real problem")));
        let text = capture.text();
        assert!(!text.contains("noise"));
        assert!(text.contains("real problem"));
    }
}
