use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::settings::RuleProvider;

fn is_empty_option_string(s: &Option<String>) -> bool {
    s.as_deref().map_or(true, str::is_empty)
}

/// Represents a complete Clash configuration output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClashYamlOutput {
    // General settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socks_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redir_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixed_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_lan: Option<bool>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub external_controller: Option<String>,

    #[serde(default)]
    pub proxies: Vec<ClashProxy>,

    #[serde(default)]
    pub proxy_groups: Vec<ClashProxyGroup>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rule_providers: BTreeMap<String, RuleProvider>,

    #[serde(default)]
    pub rules: Vec<String>,
}

/// Common proxy options shared by every proxy type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CommonProxyOptions {
    pub name: String,
    pub server: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_cert_verify: Option<bool>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub servername: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub sni: Option<String>,
    #[serde(skip_serializing_if = "is_empty_option_string")]
    pub client_fingerprint: Option<String>,
}

impl CommonProxyOptions {
    pub fn new(name: String, server: String, port: u16) -> Self {
        Self {
            name,
            server,
            port,
            udp: None,
            tls: None,
            skip_cert_verify: None,
            servername: None,
            sni: None,
            client_fingerprint: None,
        }
    }

    /// Create a builder for CommonProxyOptions
    pub fn builder(name: String, server: String, port: u16) -> CommonProxyOptionsBuilder {
        CommonProxyOptionsBuilder {
            common: Self::new(name, server, port),
        }
    }
}

/// Builder for CommonProxyOptions
pub struct CommonProxyOptionsBuilder {
    common: CommonProxyOptions,
}

impl CommonProxyOptionsBuilder {
    pub fn tls(mut self, value: bool) -> Self {
        self.common.tls = Some(value);
        self
    }

    pub fn skip_cert_verify(mut self, value: Option<bool>) -> Self {
        self.common.skip_cert_verify = value;
        self
    }

    pub fn servername(mut self, value: Option<String>) -> Self {
        self.common.servername = value;
        self
    }

    pub fn sni(mut self, value: Option<String>) -> Self {
        self.common.sni = value;
        self
    }

    pub fn client_fingerprint(mut self, value: Option<String>) -> Self {
        self.common.client_fingerprint = value;
        self
    }

    pub fn build(self) -> CommonProxyOptions {
        self.common
    }
}

/// `network` plus the matching `*-opts` block of a V2Ray-family proxy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TransportOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_opts: Option<HttpOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h2_opts: Option<H2Options>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grpc_opts: Option<GrpcOptions>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpOptions {
    pub method: String,
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct H2Options {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GrpcOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grpc_service_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RealityOptions {
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
}

/// Represents a single proxy in Clash configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "kebab-case")]
pub enum ClashProxy {
    #[serde(rename = "ss")]
    Shadowsocks {
        #[serde(flatten)]
        common: CommonProxyOptions,
        cipher: String,
        password: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        plugin: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        plugin_opts: Option<BTreeMap<String, serde_yaml::Value>>,
    },
    #[serde(rename = "vmess")]
    VMess {
        #[serde(flatten)]
        common: CommonProxyOptions,
        uuid: String,
        #[serde(rename = "alterId")]
        alter_id: u16,
        cipher: String,
        #[serde(flatten)]
        transport: TransportOptions,
    },
    #[serde(rename = "vless")]
    Vless {
        #[serde(flatten)]
        common: CommonProxyOptions,
        uuid: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        flow: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        reality_opts: Option<RealityOptions>,
        #[serde(flatten)]
        transport: TransportOptions,
    },
    #[serde(rename = "trojan")]
    Trojan {
        #[serde(flatten)]
        common: CommonProxyOptions,
        password: String,
        #[serde(flatten)]
        transport: TransportOptions,
    },
    #[serde(rename = "hysteria2")]
    Hysteria2 {
        #[serde(flatten)]
        common: CommonProxyOptions,
        #[serde(skip_serializing_if = "is_empty_option_string")]
        password: Option<String>,
        #[serde(skip_serializing_if = "is_empty_option_string")]
        ports: Option<String>,
        #[serde(skip_serializing_if = "is_empty_option_string")]
        up: Option<String>,
        #[serde(skip_serializing_if = "is_empty_option_string")]
        down: Option<String>,
        #[serde(skip_serializing_if = "is_empty_option_string")]
        obfs: Option<String>,
        #[serde(skip_serializing_if = "is_empty_option_string")]
        obfs_password: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        alpn: Vec<String>,
    },
}

impl ClashProxy {
    pub fn common(&self) -> &CommonProxyOptions {
        match self {
            ClashProxy::Shadowsocks { common, .. } => common,
            ClashProxy::VMess { common, .. } => common,
            ClashProxy::Vless { common, .. } => common,
            ClashProxy::Trojan { common, .. } => common,
            ClashProxy::Hysteria2 { common, .. } => common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CommonProxyOptions {
        match self {
            ClashProxy::Shadowsocks { common, .. } => common,
            ClashProxy::VMess { common, .. } => common,
            ClashProxy::Vless { common, .. } => common,
            ClashProxy::Trojan { common, .. } => common,
            ClashProxy::Hysteria2 { common, .. } => common,
        }
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }
}

/// Represents a proxy group in Clash configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClashProxyGroup {
    #[serde(rename = "select")]
    Select { name: String, proxies: Vec<String> },
    #[serde(rename = "url-test")]
    UrlTest {
        name: String,
        proxies: Vec<String>,
        url: String,
        interval: u32,
    },
}
