use crate::ai::AiConfig;
use crate::cli::{Cli, VerbosityLevel};
use crate::error::{ConfigError, ConfigResult as Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File names searched for in the working directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "xml-studio.toml",
    "xml-studio.json",
    ".xml-studio.toml",
    ".xml-studio.json",
];

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub ai: AiConfig,
    pub output: OutputSettings,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    /// Verbose output
    pub verbose: bool,
    /// Quiet mode (errors only)
    pub quiet: bool,
    /// Colored status line
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            verbose: false,
            quiet: false,
            color: atty::is(atty::Stream::Stderr),
        }
    }
}

impl OutputSettings {
    pub fn verbosity(&self) -> VerbosityLevel {
        VerbosityLevel::from_flags(self.verbose, self.quiet)
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment -> CLI
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        Self::load_config_with(&SystemEnvProvider, cli).await
    }

    pub async fn load_config_with(env: &impl EnvProvider, cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path).await?;
            config = Self::merge_configs(config, file_config);
        } else if let Some(found_config) = Self::find_config_file().await? {
            config = Self::merge_configs(config, found_config);
        }

        config = Self::apply_environment_overrides_with(env, config)?;

        // CLI arguments have the final say
        config = Self::merge_with_cli(config, cli);

        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find a configuration file in the working directory, then the user config directory
    pub async fn find_config_file() -> Result<Option<Config>> {
        if let Some(found) = Self::find_config_file_in(Path::new(".")).await? {
            return Ok(Some(found));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("xml-studio").join("config.toml");
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        Ok(None)
    }

    /// Look for one of [`CONFIG_FILE_NAMES`] inside `dir`
    pub async fn find_config_file_in(dir: &Path) -> Result<Option<Config>> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }
        Ok(None)
    }

    /// Apply environment variable overrides from `env`
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> Result<Config> {
        if let Some(api_key) = env.get("GEMINI_API_KEY").or_else(|| env.get("API_KEY")) {
            config.ai.api_key = Some(api_key);
        }

        if let Some(model) = env.get("XML_STUDIO_MODEL") {
            config.ai.model = model;
        }

        if let Some(base_url) = env.get("XML_STUDIO_BASE_URL") {
            config.ai.base_url = base_url;
        }

        if let Some(timeout) = env.get("XML_STUDIO_TIMEOUT") {
            config.ai.timeout_seconds = timeout.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid XML_STUDIO_TIMEOUT value: {}", timeout))
            })?;
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Some(api_key) = &cli.api_key {
            config.ai.api_key = Some(api_key.clone());
        }
        if let Some(model) = &cli.model {
            config.ai.model = model.clone();
        }
        if let Some(timeout) = cli.timeout {
            config.ai.timeout_seconds = timeout;
        }

        if cli.verbose {
            config.output.verbose = true;
            config.output.quiet = false;
        }
        if cli.quiet {
            config.output.quiet = true;
            config.output.verbose = false;
        }
        if cli.no_color {
            config.output.color = false;
        }

        config
    }

    /// Merge two configurations (second takes precedence for set values)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        if override_config.ai.api_key.is_some() {
            base.ai.api_key = override_config.ai.api_key;
        }
        base.ai.model = override_config.ai.model;
        base.ai.base_url = override_config.ai.base_url;
        base.ai.timeout_seconds = override_config.ai.timeout_seconds;
        if override_config.ai.temperature.is_some() {
            base.ai.temperature = override_config.ai.temperature;
        }

        base.output = override_config.output;

        base
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.ai.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if config.ai.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Model name cannot be empty".to_string(),
            ));
        }

        if !(config.ai.base_url.starts_with("http://") || config.ai.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "Base URL must use http or https: {}",
                config.ai.base_url
            )));
        }

        if let Some(temperature) = config.ai.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ConfigError::Validation(format!(
                "Temperature must be between 0 and 2, got {}",
                temperature
            )));
        }

        if config.output.verbose && config.output.quiet {
            return Err(ConfigError::Validation(
                "Cannot enable both verbose and quiet modes".to_string(),
            ));
        }

        Ok(())
    }

    /// Convert configuration to Duration for the AI request timeout
    pub fn get_timeout_duration(config: &Config) -> Duration {
        Duration::from_secs(config.ai.timeout_seconds)
    }

    /// Default location of the user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("xml-studio").join("config.toml"))
    }
}
