//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// `None` disables logging entirely
    pub fn as_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "proctop",
    about = "Live process monitor for Linux: PID, USER, CPU% and command line from /proc",
    version
)]
pub struct Args {
    /// Refresh interval in milliseconds (200-10000)
    #[arg(short = 'i', long)]
    pub interval_ms: Option<u64>,

    /// Root of the process pseudo-filesystem
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// Config file (key=value lines)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Ignore every config file
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Hide the one-line summary above the table
    #[arg(long)]
    pub no_header: bool,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["proctop"]).unwrap();
        assert!(args.interval_ms.is_none());
        assert!(args.log_file.is_none());
        assert_eq!(args.log_level, LogLevel::Info);
        assert!(!args.no_header);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "proctop",
            "-i",
            "500",
            "--proc-root",
            "/tmp/fakeproc",
            "--log-level",
            "trace",
            "--log-file",
            "/tmp/proctop.log",
        ])
        .unwrap();
        assert_eq!(args.interval_ms, Some(500));
        assert_eq!(args.proc_root, Some(PathBuf::from("/tmp/fakeproc")));
        assert_eq!(args.log_level.as_level(), Some(Level::TRACE));
    }

    #[test]
    fn config_and_no_config_conflict() {
        assert!(Args::try_parse_from(["proctop", "-c", "x", "--no-config"]).is_err());
    }
}
