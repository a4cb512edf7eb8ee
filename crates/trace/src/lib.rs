#![deny(clippy::arithmetic_side_effects)]
#![deny(clippy::cast_possible_truncation)]

//! Opt-in tracing output for tests.
//!
//! Set `COMB_TRACE` to one of `1`/`true`/`on`, `compact`, `pretty`, `log-file` or
//! `log-show` and filter with `RUST_LOG`. The log file modes write daily files into
//! `COMB_TRACE_PATH`, or `logs/` next to this crate's manifest.

use ctor::ctor;
use std::{
    env::var,
    path::PathBuf,
    str::FromStr,
};
use tracing_subscriber::{
    fmt::format,
    EnvFilter,
};

pub const TRACE_ENV: &str = "COMB_TRACE";
pub const TRACE_PATH_ENV: &str = "COMB_TRACE_PATH";

/// Where and how trace events are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceMode {
    /// Default formatting on stdout.
    Full,
    Compact,
    Pretty,
    /// Only into the log file.
    LogFile,
    /// Into the log file and on stderr.
    LogShow,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownTraceMode(pub String);

impl FromStr for TraceMode {
    type Err = UnknownTraceMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "true" | "on" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "log-file" => Ok(Self::LogFile),
            "log-show" => Ok(Self::LogShow),
            _ => Err(UnknownTraceMode(s.to_string())),
        }
    }
}

fn log_dir() -> PathBuf {
    var(TRACE_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/logs")))
}

/// Installs the global subscriber for `mode`. Does nothing if one is already set.
pub fn init(mode: TraceMode) {
    match mode {
        TraceMode::Full => {
            let _ = tracing_subscriber::FmtSubscriber::builder()
                .with_env_filter(EnvFilter::from_default_env())
                .try_init();
        }
        TraceMode::Compact => {
            let _ = tracing_subscriber::FmtSubscriber::builder()
                .with_env_filter(EnvFilter::from_default_env())
                .event_format(format().compact())
                .try_init();
        }
        TraceMode::Pretty => {
            let _ = tracing_subscriber::FmtSubscriber::builder()
                .with_env_filter(EnvFilter::from_default_env())
                .event_format(format().pretty())
                .try_init();
        }
        TraceMode::LogFile => {
            let log_file = tracing_appender::rolling::daily(log_dir(), "comb.log");
            let _ = tracing_subscriber::FmtSubscriber::builder()
                .with_env_filter(EnvFilter::from_default_env())
                .event_format(format().compact())
                // Escape codes end up verbatim in files.
                .with_ansi(false)
                .with_writer(log_file)
                .try_init();
        }
        TraceMode::LogShow => {
            use tracing_subscriber::prelude::*;
            let log_file = tracing_appender::rolling::daily(log_dir(), "comb.log");
            let file_layer = tracing_subscriber::fmt::Layer::new()
                .compact()
                .with_ansi(false)
                .with_writer(log_file);
            let _ = tracing_subscriber::registry()
                .with(EnvFilter::from_default_env())
                .with(tracing_subscriber::fmt::Layer::new().with_writer(std::io::stderr))
                .with(file_layer)
                .try_init();
        }
    }
}

#[ctor]
pub static TRACE: () = {
    if let Ok(mode) = var(TRACE_ENV) {
        if let Ok(mode) = mode.parse() {
            init(mode);
        }
    }
};

/// Pulls the tracing initializer into a test binary.
#[macro_export]
macro_rules! enable_tracing {
    () => {
        static _TRACE: &$crate::TRACE<()> = &$crate::TRACE;
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use tracing::*;

    enable_tracing!();

    #[test_case("1" => Ok(TraceMode::Full))]
    #[test_case("ON" => Ok(TraceMode::Full))]
    #[test_case("compact" => Ok(TraceMode::Compact))]
    #[test_case("Pretty" => Ok(TraceMode::Pretty))]
    #[test_case("log-file" => Ok(TraceMode::LogFile))]
    #[test_case("log-show" => Ok(TraceMode::LogShow))]
    #[test_case("verbose" => Err(UnknownTraceMode("verbose".to_string())))]
    fn parses_trace_mode(input: &str) -> Result<TraceMode, UnknownTraceMode> {
        input.parse()
    }

    #[test]
    fn works() {
        error!("I'm visible if COMB_TRACE=1 is set");
        info!("I'm visible if COMB_TRACE=1 and RUST_LOG=info are set");
    }
}
