//! Tracing subscriber: colored console output and the per-command log file.
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::{DRY_RUN_TARGET, STAGE_TARGET, SUMMARY_TARGET};
use crate::commands::version::VERSION;

/// `$XDG_CACHE_HOME/layout/<command>.log`, or `~/.cache/layout/<command>.log`.
///
/// Creates the directory; `None` if that fails.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME").map_or_else(
        || {
            std::env::var_os("HOME")
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    );
    let dir = base.join("layout");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// The fields of one event the formatters look at.
#[derive(Default)]
struct EventFields {
    message: String,
    status: Option<String>,
}

impl EventFields {
    fn of(event: &Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

/// Appends every event, debug included, to the command's log file.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command` and write the run header.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let mut file = fs::File::create(&path).ok()?;
        writeln!(
            file,
            "# layout {VERSION} {command} {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S")
        )
        .ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let metadata = event.metadata();
        let EventFields { message, status } = EventFields::of(event);

        let tag = match (*metadata.level(), metadata.target(), status) {
            (_, STAGE_TARGET, _) => String::from("==> "),
            (_, DRY_RUN_TARGET, _) => String::from("    [dry run] "),
            (_, SUMMARY_TARGET, Some(status)) => format!("    [{status}] "),
            (Level::ERROR, ..) => String::from("    [error] "),
            (Level::WARN, ..) => String::from("    [warn] "),
            (Level::DEBUG | Level::TRACE, ..) => String::from("    [debug] "),
            _ => String::from("    "),
        };

        if let Ok(mut file) = self.file.lock() {
            let ts = chrono::Utc::now().format("%H:%M:%S");
            writeln!(file, "[{ts}] {tag}{message}").ok();
        }
    }
}

/// Icon and color of a summary line.
fn status_style(status: &str) -> (&'static str, &'static str) {
    match status {
        "ok" => ("✓", "\x1b[32m"),
        "skipped" => ("○", "\x1b[33m"),
        "dry-run" => ("~", "\x1b[37m"),
        "failed" => ("✗", "\x1b[31m"),
        _ => ("·", "\x1b[2m"),
    }
}

/// Console output: stage arrows, dry-run prefixes, colored summary lines,
/// warnings and errors.
struct ConsoleFormatter;

impl<S, N> FormatEvent<S, N> for ConsoleFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let EventFields { message, status } = EventFields::of(event);

        match (*metadata.level(), metadata.target(), status) {
            (Level::ERROR, ..) => writeln!(writer, "\x1b[31mERROR\x1b[0m {message}"),
            (Level::WARN, ..) => writeln!(writer, "\x1b[33mWARN\x1b[0m  {message}"),
            (_, STAGE_TARGET, _) => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{message}\x1b[0m"),
            (_, DRY_RUN_TARGET, _) => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {message}"),
            (_, SUMMARY_TARGET, Some(status)) => {
                let (icon, color) = status_style(&status);
                writeln!(writer, "  {color}{icon} {message}\x1b[0m")
            }
            (Level::INFO, ..) => writeln!(writer, "  {message}"),
            _ => writeln!(writer, "  \x1b[2m{message}\x1b[0m"),
        }
    }
}

/// Install the global subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout; debug only
/// when `verbose`. All events, debug included, also go to the log file of
/// `command`. Call once at startup, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{TEST_ENV_MUTEX, isolated_logger};

    #[test]
    fn file_layer_writes_run_header() {
        let (log, tmp, _guard) = isolated_logger();
        drop(log);
        let contents =
            fs::read_to_string(tmp.path().join("layout").join("test.log")).unwrap();
        assert!(contents.starts_with("# layout "), "{contents}");
        assert!(contents.lines().next().unwrap().contains(" test "));
    }

    #[test]
    #[allow(unsafe_code)]
    fn log_file_path_uses_xdg_cache_home() {
        let tmp = tempfile::tempdir().unwrap();
        let _lock = TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", tmp.path());
        }
        let path = log_file_path("reconcile");
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        assert_eq!(path, Some(tmp.path().join("layout").join("reconcile.log")));
        assert!(tmp.path().join("layout").is_dir());
    }

    #[test]
    fn status_style_marks_failures_red() {
        assert_eq!(status_style("failed"), ("✗", "\x1b[31m"));
        assert_eq!(status_style("n/a").0, "·");
    }
}
