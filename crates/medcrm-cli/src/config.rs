// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use medcrm_app::Section;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "20s";
const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_PATH_ENV: &str = "MEDCRM_CONFIG_PATH";
const API_KEY_ENV: &str = "MEDCRM_API_KEY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub llm: Llm,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            llm: Llm::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub start_section: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Llm {
    pub enabled: Option<bool>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub extra_context: Option<String>,
    pub timeout: Option<String>,
}

impl Default for Llm {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            base_url: Some(medcrm_llm::DEFAULT_BASE_URL.to_owned()),
            model: Some(medcrm_llm::DEFAULT_MODEL.to_owned()),
            api_key: None,
            extra_context: Some(String::new()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;
        Ok(config_root.join(medcrm_data::APP_NAME).join("config.toml"))
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
                    "config file {} has no version; add `version = 1` at the top and keep values under [ui], [llm] and [log]",
                    path.display()
                )
            })?;
        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {version} in {}; expected version = 1",
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
        if let Some(section) = &self.ui.start_section
            && Section::parse(section).is_none()
        {
            let known: Vec<&str> = Section::ALL.iter().map(|section| section.as_str()).collect();
            bail!(
                "ui.start_section {section:?} in {} is not a section; use one of: {}",
                path.display(),
                known.join(", ")
            );
        }

        if let Some(base_url) = &self.llm.base_url {
            let parsed = Url::parse(base_url.trim()).with_context(|| {
                format!("llm.base_url {base_url:?} in {} is not a URL", path.display())
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "llm.base_url in {} must use http or https, got {:?}",
                    path.display(),
                    parsed.scheme()
                );
            }
        }

        if let Some(timeout) = &self.llm.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "llm.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        Ok(())
    }

    pub fn start_section(&self) -> Section {
        self.ui
            .start_section
            .as_deref()
            .and_then(Section::parse)
            .unwrap_or(Section::AdminDashboard)
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.enabled.unwrap_or(true)
    }

    pub fn llm_base_url(&self) -> &str {
        self.llm
            .base_url
            .as_deref()
            .unwrap_or(medcrm_llm::DEFAULT_BASE_URL)
            .trim()
            .trim_end_matches('/')
    }

    pub fn llm_model(&self) -> &str {
        self.llm
            .model
            .as_deref()
            .unwrap_or(medcrm_llm::DEFAULT_MODEL)
    }

    /// The configured key, else `MEDCRM_API_KEY`. Blank values count as unset.
    pub fn llm_api_key(&self) -> Option<String> {
        let non_blank = |key: &str| {
            let key = key.trim();
            (!key.is_empty()).then(|| key.to_owned())
        };
        self.llm
            .api_key
            .as_deref()
            .and_then(non_blank)
            .or_else(|| env::var(API_KEY_ENV).ok().as_deref().and_then(non_blank))
    }

    pub fn llm_timeout(&self) -> Result<Duration> {
        parse_duration(self.llm.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn llm_extra_context(&self) -> &str {
        self.llm.extra_context.as_deref().unwrap_or("")
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_dir()
            .ok_or_else(|| anyhow!("cannot resolve data directory; set [log].file in the config"))?;
        Ok(data_root
            .join(medcrm_data::APP_NAME)
            .join(format!("{}.log", medcrm_data::APP_NAME)))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# medcrm config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Section shown at startup, for example patients or appointments\nstart_section = \"admin-dashboard\"\n\n[llm]\nenabled = true\nbase_url = \"{}\"\nmodel = \"{}\"\n# api_key = \"sk-...\"   # or set {API_KEY_ENV}\nextra_context = \"\"\ntimeout = \"{DEFAULT_TIMEOUT}\"\n\n[log]\n# tracing filter directive; {} overrides it\nlevel = \"{DEFAULT_LOG_LEVEL}\"\n# file = \"/absolute/path/to/medcrm.log\"\n",
            path.display(),
            medcrm_llm::DEFAULT_BASE_URL,
            medcrm_llm::DEFAULT_MODEL,
            crate::LOG_ENV,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let split = raw
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(raw.len());
    let (amount, unit) = raw.split_at(split);
    let to_duration: fn(u64) -> Duration = match unit {
        "ms" => Duration::from_millis,
        "s" => Duration::from_secs,
        "m" => |mins| Duration::from_secs(mins.saturating_mul(60)),
        _ => bail!(
            "invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 20s)"
        ),
    };
    let amount: u64 = amount
        .parse()
        .with_context(|| format!("invalid timeout duration {raw:?}"))?;
    Ok(to_duration(amount))
}

#[cfg(test)]
mod tests {
    use super::{API_KEY_ENV, CONFIG_PATH_ENV, Config, parse_duration};
    use anyhow::Result;
    use medcrm_app::Section;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.start_section(), Section::AdminDashboard);
        assert!(config.llm_enabled());
        assert_eq!(config.llm_base_url(), "https://api.openai.com/v1");
        assert_eq!(config.llm_timeout()?, Duration::from_secs(20));
        assert_eq!(config.log_level(), "info");
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[llm]\nmodel = \"gpt-4o\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[ui], [llm] and [log]"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\nstart_section = \"appointments\"\n[llm]\nenabled = false\nbase_url = \"http://localhost:8080/v1/\"\nmodel = \"gpt-4o\"\nextra_context = \"Ward B is closed.\"\ntimeout = \"750ms\"\n[log]\nlevel = \"debug\"\nfile = \"/tmp/medcrm-test.log\"\n",
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.start_section(), Section::Appointments);
        assert!(!config.llm_enabled());
        assert_eq!(config.llm_base_url(), "http://localhost:8080/v1");
        assert_eq!(config.llm_model(), "gpt-4o");
        assert_eq!(config.llm_extra_context(), "Ward B is closed.");
        assert_eq!(config.llm_timeout()?, Duration::from_millis(750));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_path()?, PathBuf::from("/tmp/medcrm-test.log"));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unknown_start_section_lists_choices() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_section = \"pharmacy\"\n")?;
        let error = Config::load(&path).expect_err("unknown section should fail");
        let message = error.to_string();
        assert!(message.contains("\"pharmacy\""));
        assert!(message.contains("doctor-profile"));
        Ok(())
    }

    #[test]
    fn base_url_must_be_http() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[llm]\nbase_url = \"ftp://example.com\"\n")?;
        let error = Config::load(&path).expect_err("ftp base_url should fail");
        assert!(error.to_string().contains("http or https"));

        let (_temp, path) = write_config("version = 1\n[llm]\nbase_url = \"not a url\"\n")?;
        let error = Config::load(&path).expect_err("garbage base_url should fail");
        assert!(error.to_string().contains("is not a URL"));
        Ok(())
    }

    #[test]
    fn timeout_rejects_non_positive_values_in_config() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[llm]\ntimeout = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn timeout_parses_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("20s")?, Duration::from_secs(20));
        assert_eq!(parse_duration(" 2m ")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn timeout_rejects_invalid_duration() {
        let error = parse_duration("soon").expect_err("invalid duration should fail");
        let message = error.to_string();
        assert!(
            message.contains("invalid duration") || message.contains("invalid timeout duration"),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_ends_in_app_config_toml() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("medcrm/config.toml"), "got {}", path.display());
        Ok(())
    }

    #[test]
    fn api_key_prefers_config_over_env() -> Result<()> {
        let _guard = env_lock();
        let (_temp, path) = write_config("version = 1\n[llm]\napi_key = \"sk-from-config\"\n")?;
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(API_KEY_ENV, "sk-from-env");
        }
        let config = Config::load(&path)?;
        let from_config = config.llm_api_key();
        let from_env = Config::default().llm_api_key();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
        assert_eq!(from_config.as_deref(), Some("sk-from-config"));
        assert_eq!(from_env.as_deref(), Some("sk-from-env"));
        Ok(())
    }

    #[test]
    fn blank_api_key_counts_as_missing() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(API_KEY_ENV, "   ");
        }
        let (_temp, path) = write_config("version = 1\n[llm]\napi_key = \"\"\n")?;
        let config = Config::load(&path)?;
        let key = config.llm_api_key();
        let env_only = Config::default().llm_api_key();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
        assert_eq!(key, None);
        assert_eq!(env_only, None);
        Ok(())
    }

    #[test]
    fn blank_config_key_falls_back_to_env_key() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var(API_KEY_ENV, " sk-from-env ");
        }
        let (_temp, path) = write_config("version = 1\n[llm]\napi_key = \"  \"\n")?;
        let config = Config::load(&path)?;
        let key = config.llm_api_key();
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(API_KEY_ENV);
        }
        assert_eq!(key.as_deref(), Some("sk-from-env"));
        Ok(())
    }

    #[test]
    fn log_path_defaults_under_data_dir() -> Result<()> {
        let path = Config::default().log_path()?;
        assert!(path.ends_with("medcrm/medcrm.log"), "got {}", path.display());
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[llm]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, &example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.start_section(), Section::AdminDashboard);
        assert_eq!(config.llm_timeout()?, Duration::from_secs(20));
        Ok(())
    }
}
