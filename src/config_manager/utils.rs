use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

/// Config file formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything unknown is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") | Some("jsonld") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Read a configuration file into a JSON value, substituting `${VAR}` references
pub fn read_config_value(config_path: &Path) -> Result<Value> {
    if !config_path.exists() {
        anyhow::bail!("Configuration file not found: {}", config_path.display());
    }

    let content = load_text_file_with_guess_encoding(config_path)?;
    if content.trim().is_empty() {
        anyhow::bail!("Configuration file is empty: {}", config_path.display());
    }

    let content = substitute_env_vars(&content);

    let mut value = match ConfigFormat::from_path(config_path) {
        ConfigFormat::Json => serde_json::from_str::<Value>(&content)
            .with_context(|| format!("Invalid JSON in {}", config_path.display()))?,
        ConfigFormat::Yaml => serde_yaml::from_str::<Value>(&content)
            .with_context(|| format!("Invalid YAML in {}", config_path.display()))?,
    };

    // JSON-LD files carry an @context we have no use for
    if let Value::Object(ref mut obj) = value {
        obj.remove("@context");
    }

    debug!("Read configuration from {}", config_path.display());
    Ok(value)
}

/// Replace `${VAR_NAME}` with the variable's value; unset variables become empty.
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("valid env var pattern");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| {
                warn!("Environment variable {} is not set, substituting an empty value", &caps[1]);
                String::new()
            })
        })
        .into_owned()
}

/// Load text file, stripping a UTF-8 BOM and falling back to GBK for legacy files
pub fn load_text_file_with_guess_encoding(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    Ok(decode_config_bytes(&bytes))
}

fn decode_config_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (cow, _, _) = encoding_rs::GBK.decode(bytes);
            cow.into_owned()
        }
    }
}
