// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use medcrm_app::{AppState, Section};
use medcrm_data::{MockDataset, describe_view};
use runtime::ClinicRuntime;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "MEDCRM_LOG";

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
            "load config {}; run `medcrm --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    let section = options.section.unwrap_or_else(|| config.start_section());
    let data = MockDataset::demo();

    if options.print_context {
        println!("{}", describe_view(section, None, &data));
        return Ok(());
    }

    let llm_client = if config.llm_enabled() {
        let api_key = config.llm_api_key();
        Some(
            medcrm_llm::Client::new(
                config.llm_base_url(),
                config.llm_model(),
                api_key.as_deref(),
                config.llm_timeout()?,
            )
            .with_context(|| {
                format!(
                    "invalid [llm] config in {}; fix base_url/model/timeout values",
                    options.config_path.display()
                )
            })?,
        )
    } else {
        None
    };

    if options.check_only {
        return run_check(&config, llm_client.as_ref());
    }

    init_logging(&config)?;
    tracing::info!(
        config = %options.config_path.display(),
        section = section.as_str(),
        llm_enabled = config.llm_enabled(),
        base_url = config.llm_base_url(),
        model = config.llm_model(),
        has_api_key = llm_client.as_ref().is_some_and(medcrm_llm::Client::has_credentials),
        "starting medcrm"
    );

    let mut state = AppState::starting_at(section);
    let mut runtime = ClinicRuntime::new(data, llm_client, config.llm_extra_context());
    let result = medcrm_tui::run_app(&mut state, &mut runtime);
    match &result {
        Ok(()) => tracing::info!("medcrm exited"),
        Err(error) => {
            let detail = format!("{error:#}");
            tracing::error!(error = %detail, "medcrm exited with error");
        }
    }
    result
}

fn run_check(config: &Config, llm_client: Option<&medcrm_llm::Client>) -> Result<()> {
    println!("config ok; start section {}", config.start_section().as_str());
    let Some(client) = llm_client else {
        println!("assistant disabled");
        return Ok(());
    };
    if !client.has_credentials() {
        println!(
            "assistant has no API key; set [llm].api_key or MEDCRM_API_KEY to enable replies"
        );
        return Ok(());
    }
    client
        .ping()
        .with_context(|| format!("check assistant endpoint {}", client.base_url()))?;
    println!("assistant ok: {} at {}", client.model(), client.base_url());
    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = match env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive.trim())
            .with_context(|| format!("invalid {LOG_ENV} filter {directive:?}"))?,
        _ => EnvFilter::try_new(config.log_level())
            .with_context(|| format!("invalid [log].level {:?}", config.log_level()))?,
    };

    let path = config.log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}; set [log].file to a writable path", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    section: Option<Section>,
    print_config_path: bool,
    print_example: bool,
    print_context: bool,
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
        section: None,
        print_config_path: false,
        print_example: false,
        print_context: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--section" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--section requires a section id"))?;
                let section = Section::parse(value.as_ref()).ok_or_else(|| {
                    let known: Vec<&str> =
                        Section::ALL.iter().map(|section| section.as_str()).collect();
                    anyhow!(
                        "unknown section {:?}; use one of: {}",
                        value.as_ref(),
                        known.join(", ")
                    )
                })?;
                options.section = Some(section);
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--print-context" => {
                options.print_context = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("medcrm: hospital management console with a chat assistant");
    println!("  --config <path>          Use a specific config path");
    println!("  --section <id>           Start in a section (for example patients)");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --print-context          Print the assistant context for the start section");
    println!("  --check                  Validate config and reach the assistant endpoint");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use medcrm_app::Section;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/medcrm-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                section: None,
                print_config_path: false,
                print_example: false,
                print_context: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--section"], default_options_path())
            .expect_err("missing section value should fail");
        assert!(error.to_string().contains("--section requires a section id"));
    }

    #[test]
    fn parse_cli_args_parses_section() -> Result<()> {
        let options = parse_cli_args(vec!["--section", "invoices"], default_options_path())?;
        assert_eq!(options.section, Some(Section::Invoices));
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_unknown_section() {
        let error = parse_cli_args(vec!["--section", "morgue"], default_options_path())
            .expect_err("unknown section should fail");
        let message = error.to_string();
        assert!(message.contains("\"morgue\""));
        assert!(message.contains("admin-dashboard"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--demo"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-example-config",
                "--print-context",
                "--check",
            ],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.print_context);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}
