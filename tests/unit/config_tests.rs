//! Configuration loading through the public API

use clap::Parser;
use tempfile::TempDir;

use xml_studio::config::{CONFIG_FILE_NAMES, ConfigManager, EnvProvider};
use xml_studio::{Cli, Config};

use crate::common::test_helpers::write_temp_file;

struct FixedEnv(Vec<(&'static str, &'static str)>);

impl EnvProvider for FixedEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    }
}

#[test]
fn test_config_file_names() {
    assert_eq!(CONFIG_FILE_NAMES[0], "xml-studio.toml");
    assert!(CONFIG_FILE_NAMES.contains(&".xml-studio.json"));
}

#[tokio::test]
async fn test_explicit_config_file_and_env() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_temp_file(
        &temp_dir,
        "studio.json",
        r#"{"ai": {"model": "file-model", "timeout_seconds": 20}, "output": {"verbose": true}}"#,
    );

    let env = FixedEnv(vec![("API_KEY", "legacy-key")]);
    let path_arg = path.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["xml-studio", "--config", path_arg.as_str(), "repair"]).unwrap();

    let config = ConfigManager::load_config_with(&env, &cli).await.unwrap();
    assert_eq!(config.ai.api_key.as_deref(), Some("legacy-key"));
    assert_eq!(config.ai.model, "file-model");
    assert_eq!(config.ai.timeout_seconds, 20);
    assert!(config.output.verbose);
}

#[tokio::test]
async fn test_invalid_base_url_is_rejected() {
    let env = FixedEnv(vec![("XML_STUDIO_BASE_URL", "generativelanguage.googleapis.com")]);
    let temp_dir = TempDir::new().unwrap();
    let path = write_temp_file(&temp_dir, "empty.toml", "");
    let path_arg = path.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from(["xml-studio", "--config", path_arg.as_str(), "generate"]).unwrap();

    let result = ConfigManager::load_config_with(&env, &cli).await;
    assert!(result.is_err());
}

#[test]
fn test_config_serializes_to_toml() {
    let mut config = Config::default();
    config.ai.api_key = Some("k".to_string());

    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("[ai]"));
    assert!(text.contains("model = \"gemini-2.5-flash\""));

    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
