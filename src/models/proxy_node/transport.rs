/// Stream transport of a V2Ray-family node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Network {
    #[default]
    Tcp,
    Ws,
    Http,
    H2,
    Grpc,
    Kcp,
    Quic,
    Other(String),
}

impl Network {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "tcp" => Network::Tcp,
            "ws" | "websocket" => Network::Ws,
            "http" => Network::Http,
            "h2" => Network::H2,
            "grpc" => Network::Grpc,
            "kcp" | "mkcp" => Network::Kcp,
            "quic" => Network::Quic,
            other => Network::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Network::Tcp => "tcp",
            Network::Ws => "ws",
            Network::Http => "http",
            Network::H2 => "h2",
            Network::Grpc => "grpc",
            Network::Kcp => "kcp",
            Network::Quic => "quic",
            Network::Other(name) => name,
        }
    }
}

/// Transport options shared by VMess, VLESS and Trojan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transport {
    pub network: Network,
    /// Host header (ws/http) or authority list (h2)
    pub host: Option<String>,
    pub path: Option<String>,
    /// Header obfuscation type, e.g. `http` on raw tcp
    pub header_type: Option<String>,
    pub service_name: Option<String>,
}

impl Transport {
    pub fn with_network(network: Network) -> Self {
        Transport {
            network,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_aliases() {
        assert_eq!(Network::parse(""), Network::Tcp);
        assert_eq!(Network::parse("WebSocket"), Network::Ws);
        assert_eq!(Network::parse("mkcp"), Network::Kcp);
        assert_eq!(
            Network::parse("xhttp"),
            Network::Other("xhttp".to_string())
        );
        assert_eq!(Network::parse("xhttp").as_str(), "xhttp");
    }
}
