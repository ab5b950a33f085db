// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Sends tracing output to the configured log file. The terminal belongs to
/// the console, so nothing is written to stdout or stderr.
pub fn init(config: &Config) -> Result<PathBuf> {
    let path = config.log_path()?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let directive = filter_directive(config.log_level(), env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter {directive:?}; check RUST_LOG or [log].level"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    Ok(path)
}

fn filter_directive(configured: &str, from_env: Option<String>) -> String {
    match from_env {
        Some(directive) if !directive.trim().is_empty() => directive,
        _ => configured.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::filter_directive;

    #[test]
    fn rust_log_wins_over_configured_level() {
        assert_eq!(
            filter_directive("info", Some("helpdesk_api=debug".to_owned())),
            "helpdesk_api=debug"
        );
        assert_eq!(filter_directive("warn", Some("  ".to_owned())), "warn");
        assert_eq!(filter_directive("warn", None), "warn");
    }
}
