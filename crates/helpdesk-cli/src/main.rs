// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod session_file;

use anyhow::{Context, Result};
use config::Config;
use helpdesk_api::Client;
use helpdesk_app::SessionStore;
use helpdesk_tui::Console;
use session_file::SessionFile;
use std::env;
use std::path::PathBuf;
use time::{Date, OffsetDateTime};
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `helpdesk --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let session_path = config.session_path()?;
    if options.print_session_path {
        println!("{}", session_path.display());
        return Ok(());
    }

    let mut sessions = SessionFile::new(&session_path);
    if options.logout {
        sessions.clear()?;
        println!("signed out; removed {}", sessions.path().display());
        return Ok(());
    }

    let base_url = match &options.api_url {
        Some(url) => {
            config::validate_base_url(url).context("--api-url")?;
            url.trim().trim_end_matches('/').to_owned()
        }
        None => config.api_base_url(),
    };
    let client = Client::new(&base_url, config.api_timeout()?).with_context(|| {
        format!(
            "invalid [api] config in {}; fix base_url/timeout values or set HELPDESK_API_URL",
            options.config_path.display()
        )
    })?;

    let log_path = logging::init(&config)?;
    info!(
        base_url = %base_url,
        session = %session_path.display(),
        log = %log_path.display(),
        "starting helpdesk"
    );

    if options.check_only {
        client.ping()?;
        println!("ok: {base_url} reachable");
        return Ok(());
    }

    let mut console = Console::new(client, sessions, utc_today);
    helpdesk_tui::run_app(&mut console)
}

fn utc_today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    api_url: Option<String>,
    print_config_path: bool,
    print_session_path: bool,
    print_example: bool,
    logout: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        api_url: None,
        print_config_path: false,
        print_session_path: false,
        print_example: false,
        logout: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--api-url" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--api-url requires a URL"))?;
                options.api_url = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-session-path" => {
                options.print_session_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--logout" => {
                options.logout = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("helpdesk");
    println!("  --config <path>          Use a specific config path");
    println!("  --api-url <url>          Override [api].base_url for this run");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-session-path     Print resolved saved-session path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --logout                 Forget the saved session and exit");
    println!("  --check                  Validate config and reach the backend, then exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn fallback_config_path() -> PathBuf {
        PathBuf::from("/tmp/helpdesk-config.toml")
    }

    #[test]
    fn no_args_keeps_fallback_config_and_runs_console() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), fallback_config_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: fallback_config_path(),
                api_url: None,
                print_config_path: false,
                print_session_path: false,
                print_example: false,
                logout: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn config_and_api_url_overrides_are_kept() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--config",
                "/custom/config.toml",
                "--api-url",
                "http://desk:3000/api",
            ],
            fallback_config_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        assert_eq!(options.api_url.as_deref(), Some("http://desk:3000/api"));
        Ok(())
    }

    #[test]
    fn flags_with_values_require_them() {
        let error = parse_cli_args(vec!["--config"], fallback_config_path())
            .expect_err("--config without a path");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--api-url"], fallback_config_path())
            .expect_err("--api-url without a URL");
        assert!(error.to_string().contains("--api-url requires a URL"));
    }

    #[test]
    fn unknown_flag_is_rejected_with_help_hint() {
        let error = parse_cli_args(vec!["--wat"], fallback_config_path())
            .expect_err("--wat is not a flag");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn one_shot_flags_are_all_recorded() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-session-path",
                "--print-example-config",
                "--logout",
                "--check",
            ],
            fallback_config_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_session_path);
        assert!(options.print_example);
        assert!(options.logout);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn help_accepts_long_and_short_forms() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], fallback_config_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], fallback_config_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
