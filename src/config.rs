//! proctop configuration (htoprc-style key=value format)
//!
//! Read from `$PROCTOP_CONFIG`, `$XDG_CONFIG_HOME/proctop/proctoprc` or
//! `~/.config/proctop/proctoprc`. The file is never written back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::app::App;
use crate::cli::Args;
use crate::system::procfs::DEFAULT_PROC_ROOT;

pub const MIN_INTERVAL_MS: u64 = 200;
pub const MAX_INTERVAL_MS: u64 = 10_000;

/// Locate the config file from an environment lookup
fn config_path_with(env: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(explicit) = env("PROCTOP_CONFIG").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(explicit));
    }
    let base = env("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("proctop").join("proctoprc"))
}

pub fn config_path() -> Option<PathBuf> {
    config_path_with(|key| std::env::var(key).ok())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProctopConfig {
    pub update_interval_ms: u64,
    pub proc_root: PathBuf,
    pub show_header: bool,
}

impl Default for ProctopConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 1000,
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            show_header: true,
        }
    }
}

fn clamp_interval(ms: u64) -> u64 {
    ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS)
}

impl ProctopConfig {
    /// Parse rc-file content; unknown keys and bad values are ignored
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim();
                match key.trim() {
                    "update_interval_ms" => {
                        if let Ok(v) = value.parse::<u64>() {
                            cfg.update_interval_ms = clamp_interval(v);
                        }
                    }
                    "proc_root" => {
                        if !value.is_empty() {
                            cfg.proc_root = PathBuf::from(value);
                        }
                    }
                    "show_header" => cfg.show_header = value == "1",
                    _ => {} // Ignore unknown keys
                }
            }
        }

        cfg
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read config {}", path.display())),
        }
    }

    /// Resolve the effective config: CLI over file over defaults
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut cfg = if args.no_config {
            Self::default()
        } else if let Some(path) = &args.config {
            // An explicitly named file has to exist
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            Self::parse(&content)
        } else {
            match config_path() {
                Some(path) => Self::load_from(&path)?,
                None => Self::default(),
            }
        };
        cfg.apply_args(args);
        Ok(cfg)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ms) = args.interval_ms {
            self.update_interval_ms = clamp_interval(ms);
        }
        if let Some(root) = &args.proc_root {
            self.proc_root = root.clone();
        }
        if args.no_header {
            self.show_header = false;
        }
    }

    /// Apply loaded config to App state
    pub fn apply_to(&self, app: &mut App) {
        app.update_interval_ms = self.update_interval_ms;
        app.show_header = self.show_header;
    }
}
