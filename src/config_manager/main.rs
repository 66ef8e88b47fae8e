use std::path::{Path, PathBuf};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config_manager::system::SystemConfig;
use crate::config_manager::translation::TranslationConfig;
use crate::translate::Direction;

/// Main configuration for the translation service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,

    #[serde(default)]
    pub translation_config: TranslationConfig,
}

impl Config {
    /// Load configuration from a YAML, JSON or JSON-LD file
    pub fn load(path: &Path) -> Result<Self> {
        use crate::config_manager::utils::read_config_value;
        let value = read_config_value(path)?;
        let config: Config = serde_json::from_value(value)?;
        Ok(config)
    }

    /// Locate the config file, falling back to built-in defaults when none exists.
    ///
    /// Environment overrides are applied and the result validated either way.
    pub fn discover() -> Result<Self> {
        let mut config = None;
        for path in candidate_paths() {
            if !path.exists() {
                debug!("No config at {}", path.display());
                continue;
            }
            // A file that exists but does not parse is a startup error, not a fallback
            let loaded = Config::load(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config {}: {:#}", path.display(), e))?;
            info!("Loaded configuration from: {}", path.display());
            config = Some(loaded);
            break;
        }

        let mut config = config.unwrap_or_else(|| {
            info!("No config file found, using defaults");
            Config::default()
        });
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `TRANSLATE_HOST`, `TRANSLATE_PORT`, `TRANSLATE_DEFAULT_DIRECTION`,
    /// `INFERENCE_BASE_URL` and `INFERENCE_API_KEY`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("TRANSLATE_HOST") {
            self.system_config.host = host;
        }
        if let Some(port) = lookup("TRANSLATE_PORT").and_then(|p| p.parse().ok()) {
            self.system_config.port = port;
        }
        if let Some(direction) = lookup("TRANSLATE_DEFAULT_DIRECTION") {
            match direction.parse::<Direction>() {
                Ok(d) => self.translation_config.default_direction = d,
                Err(e) => warn!("Ignoring TRANSLATE_DEFAULT_DIRECTION: {}", e),
            }
        }
        if let Some(base_url) = lookup("INFERENCE_BASE_URL") {
            self.translation_config.base_url = base_url;
        }
        if let Some(api_key) = lookup("INFERENCE_API_KEY").filter(|k| !k.trim().is_empty()) {
            self.translation_config.api_key = Some(api_key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.system_config
            .validate_port()
            .map_err(|e| anyhow::anyhow!(e))?;
        self.translation_config
            .validate()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    }
}

fn candidate_paths() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    let names = ["conf.yaml", "conf.json", "conf.jsonld"];
    let mut paths: Vec<PathBuf> = std::env::var("CONFIG_PATH")
        .ok()
        .map(PathBuf::from)
        .into_iter()
        .collect();
    paths.extend(names.iter().map(PathBuf::from));
    if let Some(dir) = exe_dir {
        paths.extend(names.iter().map(|n| dir.join(n)));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_manager::translation::InferenceProtocol;
    use std::collections::HashMap;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", uuid::Uuid::new_v4(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_yaml_with_defaults_for_missing_fields() {
        let path = write_temp(
            "conf.yaml",
            r#"
system_config:
  port: 9100
translation_config:
  protocol: marian_server
  base_url: http://127.0.0.1:8001
  default_direction: zh-en
  models:
    en_zh:
      model_id: Helsinki-NLP/opus-mt-en-zh
      enabled: false
"#,
        );
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.system_config.host, "0.0.0.0");
        assert_eq!(config.system_config.port, 9100);
        let tc = &config.translation_config;
        assert_eq!(tc.protocol, InferenceProtocol::MarianServer);
        assert_eq!(tc.default_direction, Direction::ZhToEn);
        assert!(!tc.models.en_zh.enabled);
        assert_eq!(tc.models.zh_en.model_id, "Helsinki-NLP/opus-mt-zh-en");
        assert_eq!(tc.max_concurrent_generations, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_jsonld_ignoring_context() {
        let path = write_temp(
            "conf.jsonld",
            r#"{
  "@context": {"@vocab": "https://example.org/config#"},
  "system_config": {"host": "127.0.0.1", "port": 8080},
  "translation_config": {"warmup_on_start": false}
}"#,
        );
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.system_config.listen_addr(), "127.0.0.1:8080");
        assert!(!config.translation_config.warmup_on_start);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("{}-absent.yaml", uuid::Uuid::new_v4()));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("TRANSLATE_PORT", "9000"),
            ("INFERENCE_BASE_URL", "http://models:8000"),
            ("INFERENCE_API_KEY", "  "),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.system_config.port, 9000);
        assert_eq!(config.system_config.host, "0.0.0.0");
        assert_eq!(config.translation_config.base_url, "http://models:8000");
        assert!(config.translation_config.api_key.is_none());
    }

    #[test]
    fn default_direction_override_accepts_either_spelling() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == "TRANSLATE_DEFAULT_DIRECTION").then(|| "ZH_EN".to_string()));
        assert_eq!(config.translation_config.default_direction, Direction::ZhToEn);

        config.apply_overrides(|k| (k == "TRANSLATE_DEFAULT_DIRECTION").then(|| "en-fr".to_string()));
        assert_eq!(config.translation_config.default_direction, Direction::ZhToEn);
    }

    #[test]
    fn unset_placeholder_leaves_api_key_empty() {
        let path = write_temp(
            "conf.yaml",
            "translation_config:\n  api_key: ${VTB_TEST_NEVER_SET_KEY}\n",
        );
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(config.translation_config.api_key.is_none());
    }

    #[test]
    fn unparsable_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == "TRANSLATE_PORT").then(|| "http".to_string()));
        assert_eq!(config.system_config.port, 8000);
    }
}
