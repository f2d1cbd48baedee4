// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the file logger when `[log].path` is set.
///
/// The terminal belongs to the TUI, so nothing is written to stdout or
/// stderr. Without a path no subscriber is installed and events are dropped.
pub fn init(config: &Config) -> Result<()> {
    let Some(path) = config.log_path() else {
        return Ok(());
    };

    let file = open_log_file(&path)?;
    let directives = filter_directives(&config.log_level(), env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directives)
        .with_context(|| format!("invalid log filter {directives:?}; check RUST_LOG"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))
}

// RUST_LOG wins over the configured level when it is set.
fn filter_directives(level: &str, rust_log: Option<String>) -> String {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives,
        _ => level.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{filter_directives, open_log_file};
    use anyhow::Result;
    use std::io::Write;

    #[test]
    fn rust_log_overrides_configured_level() {
        assert_eq!(filter_directives("info", None), "info");
        assert_eq!(filter_directives("info", Some("  ".to_owned())), "info");
        assert_eq!(
            filter_directives("info", Some("stockview_tui=trace".to_owned())),
            "stockview_tui=trace"
        );
    }

    #[test]
    fn log_file_opens_in_append_mode_and_creates_parents() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("stockview.log");

        writeln!(open_log_file(&path)?, "first")?;
        writeln!(open_log_file(&path)?, "second")?;

        assert_eq!(std::fs::read_to_string(&path)?, "first\nsecond\n");
        Ok(())
    }
}
