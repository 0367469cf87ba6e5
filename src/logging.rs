use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map `-v` occurrences to a level: none is warn, one info, two debug, more trace.
pub fn level_for_verbosity(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// `RUST_LOG` wins over the level passed in.
fn filter(default: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default.as_str().to_lowercase()))
}

/// Log to stderr, for the command line tool.
///
/// Installing twice is not an error; the first subscriber stays in place.
/// Tests rely on this when several of them set up logging.
pub fn init_stderr(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter(level))
        .try_init();
}

/// Append plain-text logs to `path`, for the server. Like [`init_stderr`],
/// an already installed subscriber is left alone.
pub fn init_file(path: &Path, level: Level) -> io::Result<()> {
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_env_filter(filter(level))
        .try_init();
    Ok(())
}
