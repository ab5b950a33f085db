// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "helpdesk";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_API_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub session: Session,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            api: Api::default(),
            session: Session::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Api {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Session {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("HELPDESK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set HELPDESK_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [api], [session], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(base_url) = &self.api.base_url {
            validate_base_url(base_url)
                .with_context(|| format!("api.base_url in {}", path.display()))?;
        }

        if let Some(timeout) = &self.api.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "api.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level in {} is not a valid filter directive: {level:?}",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Config value first, then `HELPDESK_API_URL`, then the local default.
    pub fn api_base_url(&self) -> String {
        if let Some(base_url) = &self.api.base_url {
            return base_url.trim_end_matches('/').to_owned();
        }
        if let Ok(from_env) = env::var("HELPDESK_API_URL")
            && !from_env.trim().is_empty()
        {
            return from_env.trim().trim_end_matches('/').to_owned();
        }
        DEFAULT_API_URL.to_owned()
    }

    pub fn api_timeout(&self) -> Result<Duration> {
        parse_duration(self.api.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        match &self.session.path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(data_dir()?.join("session.json")),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(data_dir()?.join("helpdesk.log")),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# helpdesk config\n# Place this file at: {}\n\nversion = 1\n\n[api]\n# HELPDESK_API_URL is used when base_url is unset\nbase_url = \"{}\"\ntimeout = \"{}\"\n\n[session]\n# Optional. Default is the platform data dir (for example ~/.local/share/helpdesk/session.json)\n# path = \"/absolute/path/to/session.json\"\n\n[log]\n# tracing filter directive; RUST_LOG wins when set\nlevel = \"{}\"\n# file = \"/absolute/path/to/helpdesk.log\"\n",
            path.display(),
            DEFAULT_API_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn data_dir() -> Result<PathBuf> {
    let root = dirs::data_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [session].path and [log].file explicitly")
    })?;
    Ok(root.join(APP_NAME))
}

pub fn validate_base_url(raw: &str) -> Result<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("base URL is empty; use for example {DEFAULT_API_URL}");
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        bail!("base URL {trimmed:?} must start with http:// or https://");
    }
    Ok(())
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid timeout duration {raw:?}"))?;
        let Some(secs) = mins.checked_mul(60) else {
            bail!(
                "timeout {raw:?} is too large; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)"
            );
        };
        return Ok(Duration::from_secs(secs));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 10s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn absent_file_falls_back_to_local_backend() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.api_timeout()?, Duration::from_secs(10));
        assert_eq!(config.log_level(), "info");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[api]\nbase_url = \"http://localhost:3000/api\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[api], [session], and [log]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[api]\nbase_url = \"https://desk.example.com/api/\"\ntimeout = \"500ms\"\n[session]\npath = \"/tmp/desk/session.json\"\n[log]\nlevel = \"helpdesk_api=debug,warn\"\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.api_base_url(), "https://desk.example.com/api");
        assert_eq!(config.api_timeout()?, Duration::from_millis(500));
        assert_eq!(
            config.session_path()?,
            PathBuf::from("/tmp/desk/session.json")
        );
        assert_eq!(config.log_level(), "helpdesk_api=debug,warn");
        Ok(())
    }

    #[test]
    fn broken_toml_names_the_file() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("broken TOML");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn future_version_is_refused() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn non_http_base_url_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\nbase_url = \"ftp://desk\"\n")?;
        let error = Config::load(&path).expect_err("ftp scheme should fail");
        assert!(format!("{error:#}").contains("http:// or https://"));

        let (_temp, path) = write_config("version = 1\n[api]\nbase_url = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank URL should fail");
        assert!(format!("{error:#}").contains("empty"));
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[api]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("0s timeout");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn bad_log_directive_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"helpdesk=loud\"\n")?;
        let error = Config::load(&path).expect_err("bad directive should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn env_url_applies_only_when_config_is_silent() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("HELPDESK_API_URL", "http://from-env:9000/api/");
        }
        let (_temp, silent) = write_config("version = 1\n")?;
        let (_temp2, explicit) =
            write_config("version = 1\n[api]\nbase_url = \"http://from-config/api\"\n")?;
        let from_env = Config::load(&silent)?.api_base_url();
        let from_config = Config::load(&explicit)?.api_base_url();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("HELPDESK_API_URL");
        }
        assert_eq!(from_env, "http://from-env:9000/api");
        assert_eq!(from_config, "http://from-config/api");
        Ok(())
    }

    #[test]
    fn helpdesk_config_path_env_wins() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("HELPDESK_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("HELPDESK_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("250ms")?, Duration::from_millis(250));
        assert_eq!(parse_duration("10s")?, Duration::from_secs(10));
        assert_eq!(parse_duration("1m")?, Duration::from_secs(60));
        assert!(parse_duration("soon").is_err());
        let error = parse_duration(&format!("{}m", u64::MAX)).expect_err("overflowing minutes");
        assert!(error.to_string().contains("too large"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:3000/api"));
        assert_eq!(config.log_level(), "info");
        Ok(())
    }
}
