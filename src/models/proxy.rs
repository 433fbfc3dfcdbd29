//! Proxy model definitions
//!
//! Contains the normalized node record produced by the link decoders and
//! consumed by the generators.

use super::proxy_node::{
    Hysteria2Proxy, ShadowsocksProxy, TrojanProxy, VMessProxy, VlessProxy,
};
use crate::error::ExplodeError;

/// Represents the type of a proxy.
/// This is the canonical enum used for proxy type identification across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyType {
    Shadowsocks,
    VMess,
    Vless,
    Trojan,
    Hysteria2,
}

impl ProxyType {
    /// Human-readable name of the protocol.
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => "SS",
            ProxyType::VMess => "VMess",
            ProxyType::Vless => "Vless",
            ProxyType::Trojan => "Trojan",
            ProxyType::Hysteria2 => "Hysteria2",
        }
    }

    /// Canonical link scheme, without the `://` marker.
    pub fn scheme(self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => "ss",
            ProxyType::VMess => "vmess",
            ProxyType::Vless => "vless",
            ProxyType::Trojan => "trojan",
            ProxyType::Hysteria2 => "hysteria2",
        }
    }
}

/// Protocol specific part of a proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxySettings {
    Shadowsocks(ShadowsocksProxy),
    VMess(VMessProxy),
    Vless(VlessProxy),
    Trojan(TrojanProxy),
    Hysteria2(Hysteria2Proxy),
}

/// Represents a decoded proxy node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    /// Display name. Empty until the registry assigns a positional default.
    pub remark: String,
    pub hostname: String,
    pub port: u16,
    pub settings: ProxySettings,
}

impl Proxy {
    /// Build a proxy, rejecting an empty host or a zero port.
    pub fn construct(
        remark: impl Into<String>,
        hostname: impl Into<String>,
        port: u16,
        settings: ProxySettings,
    ) -> Result<Self, ExplodeError> {
        let hostname = hostname.into();
        if hostname.trim().is_empty() {
            return Err(ExplodeError::MissingHost);
        }
        if port == 0 {
            return Err(ExplodeError::InvalidPort);
        }

        Ok(Proxy {
            remark: remark.into(),
            hostname,
            port,
            settings,
        })
    }

    pub fn proxy_type(&self) -> ProxyType {
        match self.settings {
            ProxySettings::Shadowsocks(_) => ProxyType::Shadowsocks,
            ProxySettings::VMess(_) => ProxyType::VMess,
            ProxySettings::Vless(_) => ProxyType::Vless,
            ProxySettings::Trojan(_) => ProxyType::Trojan,
            ProxySettings::Hysteria2(_) => ProxyType::Hysteria2,
        }
    }

    /// `host:port`, with IPv6 literals wrapped in brackets.
    pub fn server_address(&self) -> String {
        if self.hostname.contains(':') {
            format!("[{}]:{}", self.hostname, self.port)
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trojan() -> ProxySettings {
        ProxySettings::Trojan(TrojanProxy {
            password: "secret".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_construct_rejects_missing_host() {
        let result = Proxy::construct("", "  ", 443, trojan());
        assert_eq!(result, Err(ExplodeError::MissingHost));
    }

    #[test]
    fn test_construct_rejects_zero_port() {
        let result = Proxy::construct("", "example.com", 0, trojan());
        assert_eq!(result, Err(ExplodeError::InvalidPort));
    }

    #[test]
    fn test_server_address_brackets_ipv6() {
        let node = Proxy::construct("n", "2001:db8::1", 443, trojan()).unwrap();
        assert_eq!(node.server_address(), "[2001:db8::1]:443");
        assert_eq!(node.proxy_type(), ProxyType::Trojan);
    }
}
