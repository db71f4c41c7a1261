use std::path::Path;

use marquee_core::config::{AppConfig, DEFAULT_OMDB_BASE_URL};
use marquee_core::util::{is_http_url, normalize_text_option};

use crate::cli::ConfigCommands;
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            let config = crate::commands::common::load_config(config_path)?;
            for line in format_config_lines(&config, config_path) {
                println!("{line}");
            }
            Ok(())
        }
        ConfigCommands::Init {
            api_key,
            base_url,
            debounce_ms,
            min_query_len,
            timeout_secs,
        } => {
            let existing = AppConfig::load_from_path(config_path)
                .map_err(|error| CliError::Config(format!("{}: {error}", config_path.display())))?;
            let updated = apply_config_init(
                existing,
                ConfigUpdate {
                    api_key,
                    base_url,
                    debounce_ms,
                    min_query_len,
                    timeout_secs,
                },
            )?;
            updated.save_to_path(config_path)?;
            println!("Saved configuration to {}", config_path.display());
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigUpdate {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub debounce_ms: Option<i64>,
    pub min_query_len: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Merge explicit `config init` flags over the existing file values.
pub fn apply_config_init(
    mut config: AppConfig,
    update: ConfigUpdate,
) -> Result<AppConfig, CliError> {
    if let Some(api_key) = normalize_text_option(update.api_key) {
        config.omdb_api_key = Some(api_key);
    }
    if let Some(base_url) = normalize_text_option(update.base_url) {
        if !is_http_url(&base_url) {
            return Err(CliError::Config(
                "--base-url must include http:// or https://".to_string(),
            ));
        }
        config.omdb_base_url = Some(base_url);
    }
    if let Some(debounce_ms) = update.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if let Some(min_query_len) = update.min_query_len {
        config.min_query_len = min_query_len;
    }
    if let Some(timeout_secs) = update.timeout_secs {
        if timeout_secs == 0 {
            return Err(CliError::Config(
                "--timeout-secs must be at least 1".to_string(),
            ));
        }
        config.request_timeout_secs = timeout_secs;
    }
    Ok(config)
}

pub fn format_config_lines(config: &AppConfig, path: &Path) -> Vec<String> {
    let api_key = if config.omdb_api_key.is_some() {
        "[set]"
    } else {
        "[not set]"
    };

    vec![
        format!("config file:     {}", path.display()),
        format!("omdb_api_key:    {api_key}"),
        format!(
            "omdb_base_url:   {}",
            config.omdb_base_url.as_deref().unwrap_or(DEFAULT_OMDB_BASE_URL)
        ),
        format!("debounce_ms:     {}", config.debounce_delay().as_millis()),
        format!("min_query_len:   {}", config.min_query_len),
        format!("request_timeout: {}s", config.request_timeout_secs),
    ]
}
