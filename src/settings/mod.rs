//! Conversion settings
//!
//! Every key is optional; a missing key keeps the built-in default. Settings
//! files may be TOML or YAML.

mod defaults;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;
pub use defaults::{
    default_rule_providers, default_rules, DEFAULT_SELECTOR, DEFAULT_TEST_INTERVAL,
    DEFAULT_TEST_URL, DEFAULT_URL_TEST,
};

/// General section of the generated Clash document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub port: Option<u16>,
    pub socks_port: Option<u16>,
    pub redir_port: Option<u16>,
    pub mixed_port: Option<u16>,
    pub allow_lan: Option<bool>,
    pub mode: Option<String>,
    pub log_level: Option<String>,
    pub external_controller: Option<String>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            port: Some(7890),
            socks_port: Some(7891),
            redir_port: Some(7892),
            mixed_port: None,
            allow_lan: Some(false),
            mode: Some("rule".to_string()),
            log_level: Some("info".to_string()),
            external_controller: Some("127.0.0.1:9090".to_string()),
        }
    }
}

/// Proxy groups built from the node list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    pub selector_name: String,
    /// Put `DIRECT` in front of the nodes in the selector
    pub selector_include_direct: bool,
    pub url_test: bool,
    pub url_test_name: String,
    pub test_url: String,
    pub interval: u32,
}

impl Default for GroupSettings {
    fn default() -> Self {
        GroupSettings {
            selector_name: DEFAULT_SELECTOR.to_string(),
            selector_include_direct: false,
            url_test: true,
            url_test_name: DEFAULT_URL_TEST.to_string(),
            test_url: DEFAULT_TEST_URL.to_string(),
            interval: DEFAULT_TEST_INTERVAL,
        }
    }
}

/// Options applied to every generated Clash proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyOptions {
    pub udp: Option<bool>,
    /// Overrides per-node `allowInsecure`/`insecure` when set
    pub skip_cert_verify: Option<bool>,
    /// Skip certificate checks for vless, and for trojan/hysteria2 links
    /// that carry no `allowInsecure`/`insecure` flag
    pub insecure_by_default: bool,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        ProxyOptions {
            udp: Some(true),
            skip_cert_verify: None,
            insecure_by_default: true,
        }
    }
}

/// A Clash `rule-providers` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleProvider {
    #[serde(rename = "type")]
    pub provider_type: String,
    pub behavior: String,
    pub url: String,
    pub path: String,
    pub interval: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub groups: GroupSettings,
    pub proxy: ProxyOptions,
    pub rule_providers: BTreeMap<String, RuleProvider>,
    pub rules: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            general: GeneralSettings::default(),
            groups: GroupSettings::default(),
            proxy: ProxyOptions::default(),
            rule_providers: default_rule_providers(),
            rules: default_rules(),
        }
    }
}

impl Settings {
    /// Load settings from a `.toml`, `.yaml` or `.yml` file.
    ///
    /// Files with another extension are parsed as TOML first, then YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ConvertError::Settings(format!("{}: {}", path.display(), e)))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let settings = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content)?,
            _ => Self::from_toml_str(&content).or_else(|_| Self::from_yaml_str(&content))?,
        };

        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConvertError> {
        toml::from_str(content).map_err(|e| ConvertError::Settings(e.to_string()))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConvertError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConvertError::Settings(e.to_string()))
    }
}
