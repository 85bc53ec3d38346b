use std::fs;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use memory_browser::{Cli, paths};

/// Events logged under this target also go to stderr, whatever `RUST_LOG` says.
pub const FAILURE_TARGET: &str = "memory_browser::failure";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonLogFormat {
    Pretty,
    Compact,
}

/// How the launcher's own diagnostics are shown on stdout.
#[derive(Clone, Copy, Debug)]
pub struct LogOptions {
    pub verbose: bool,
    /// `None` keeps human-readable lines.
    pub json: Option<JsonLogFormat>,
}

impl LogOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        let json = cli.log_json.then_some(if cli.pretty {
            JsonLogFormat::Pretty
        } else {
            JsonLogFormat::Compact
        });
        Self {
            verbose: cli.verbose,
            json,
        }
    }
}

/// Installs the global subscriber:
/// 1. Stdout, shaped by `options` and filtered by `RUST_LOG`.
/// 2. Stderr, carrying only [`FAILURE_TARGET`] errors.
/// 3. A JSON debug log at `~/.memory-browser/logs/launch-<id>.log` when `launch_id` is given.
///
/// The returned guard must live until exit so the file log is flushed.
pub fn init(options: LogOptions, launch_id: Option<&str>) -> Option<WorkerGuard> {
    let mut layers = vec![stdout_layer(options), failure_layer()];
    let guard = match launch_id.and_then(launch_file_layer) {
        Some((layer, guard)) => {
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry().with(layers).init();
    guard
}

fn stdout_layer(options: LogOptions) -> BoxedLayer {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_env_filter(options.verbose));

    match options.json {
        Some(JsonLogFormat::Pretty) => fmt::layer()
            .json()
            .with_writer(|| PrettyJsonWriter::new(std::io::stdout()))
            .with_filter(filter)
            .boxed(),
        Some(JsonLogFormat::Compact) => fmt::layer()
            .json()
            .with_writer(std::io::stdout)
            .with_filter(filter)
            .boxed(),
        None if options.verbose => fmt::layer()
            .with_writer(std::io::stdout)
            .with_filter(filter)
            .boxed(),
        None => fmt::layer()
            .with_writer(std::io::stdout)
            .without_time()
            .with_target(false)
            .with_filter(filter)
            .boxed(),
    }
}

/// Bare messages on stderr so a failed launch is visible even with `RUST_LOG=off`.
fn failure_layer() -> BoxedLayer {
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_filter(Targets::new().with_target(FAILURE_TARGET, Level::ERROR))
        .boxed()
}

fn launch_file_layer(launch_id: &str) -> Option<(BoxedLayer, WorkerGuard)> {
    let log_dir = paths::log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log dir {}: {e}", log_dir.display());
        return None;
    }

    // one file per launch, never rotated
    let appender = tracing_appender::rolling::never(&log_dir, format!("launch-{launch_id}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .json()
        .with_writer(writer)
        .with_filter(Targets::new().with_default(Level::DEBUG))
        .boxed();
    Some((layer, guard))
}

/// Re-indents each JSON event the formatter hands over; anything else passes through.
struct PrettyJsonWriter<W: std::io::Write> {
    inner: W,
}

impl<W: std::io::Write> PrettyJsonWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: std::io::Write> std::io::Write for PrettyJsonWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(s) = std::str::from_utf8(buf) {
            let trimmed = s.trim();
            if trimmed.starts_with('{')
                && trimmed.ends_with('}')
                && let Ok(val) = serde_json::from_str::<serde_json::Value>(trimmed)
                && serde_json::to_writer_pretty(&mut self.inner, &val).is_ok()
            {
                self.inner.write_all(b"\n")?;
                return Ok(buf.len());
            }
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

fn default_env_filter(verbose: bool) -> EnvFilter {
    let spec = if verbose {
        "memory_browser=debug,reqwest=warn,info"
    } else {
        "memory_browser=info,warn"
    };
    EnvFilter::new(spec)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn options(args: &[&str]) -> LogOptions {
        let argv = std::iter::once("memory-browser").chain(args.iter().copied());
        LogOptions::from_cli(&Cli::parse_from(argv))
    }

    #[test]
    fn json_format_follows_flags() {
        assert_eq!(options(&[]).json, None);
        assert_eq!(options(&["--log-json"]).json, Some(JsonLogFormat::Compact));
        assert_eq!(
            options(&["--log-json", "--pretty"]).json,
            Some(JsonLogFormat::Pretty)
        );
        assert!(options(&["-v"]).verbose);
    }

    #[test]
    fn pretty_writer_reindents_json_events() {
        use std::io::Write;

        let mut out = Vec::new();
        PrettyJsonWriter::new(&mut out)
            .write_all(b"{\"level\":\"INFO\"}\n")
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"level\": \"INFO\"\n}\n");
    }
}
