//! Per-protocol node records.
//!
//! Every protocol keeps only the fields its link format can carry; anything
//! a link may omit is an `Option`.

mod transport;

pub use transport::{Network, Transport};

/// Shadowsocks credentials and optional SIP003 plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowsocksProxy {
    pub method: String,
    pub password: String,
    pub plugin: Option<String>,
    /// Plugin options in the format of `key1=value1;key2=value2`
    pub plugin_opts: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VMessProxy {
    pub uuid: String,
    pub alter_id: u16,
    pub cipher: String,
    pub transport: Transport,
    pub tls: bool,
    pub sni: Option<String>,
}

/// TLS flavour of a VLESS node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VlessSecurity {
    #[default]
    None,
    Tls,
    Reality {
        public_key: String,
        short_id: Option<String>,
    },
}

impl VlessSecurity {
    pub fn is_tls(&self) -> bool {
        !matches!(self, VlessSecurity::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VlessSecurity::None => "none",
            VlessSecurity::Tls => "tls",
            VlessSecurity::Reality { .. } => "reality",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlessProxy {
    pub uuid: String,
    pub flow: Option<String>,
    pub transport: Transport,
    pub security: VlessSecurity,
    pub sni: Option<String>,
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrojanProxy {
    pub password: String,
    pub transport: Transport,
    pub sni: Option<String>,
    pub allow_insecure: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hysteria2Proxy {
    pub password: Option<String>,
    pub sni: Option<String>,
    pub obfs: Option<String>,
    pub obfs_password: Option<String>,
    pub allow_insecure: Option<bool>,
    /// upload speed in Mbps
    pub up_mbps: Option<u32>,
    /// download speed in Mbps
    pub down_mbps: Option<u32>,
    pub alpn: Vec<String>,
    /// Port hopping range, e.g. `20000-50000`
    pub ports: Option<String>,
}
