use super::common::{non_empty, parse_flag, parse_link_url, query_map, url_host, url_remark};
use crate::error::ExplodeError;
use crate::models::{Network, Proxy, ProxySettings, Transport, TrojanProxy};
use crate::utils::url::url_decode;

/// Parse a Trojan link into a Proxy object
///
/// Format: `trojan://password@server:port?sni=...&allowInsecure=1&type=ws&path=...#remark`
pub fn explode_trojan(trojan: &str) -> Result<Proxy, ExplodeError> {
    let url = parse_link_url(trojan)?;

    // A raw ':' splits the userinfo, both halves belong to the password
    let password = match url.password() {
        Some(pass) => format!("{}:{}", url_decode(url.username()), url_decode(pass)),
        None => url_decode(url.username()),
    };
    if password.is_empty() {
        return Err(ExplodeError::MissingCredential);
    }

    let host = url_host(&url)?;
    let port = url.port().unwrap_or(443);

    let params = query_map(&url);

    // SNI may come as either "sni" or "peer"
    let sni = non_empty(params.get("sni")).or_else(|| non_empty(params.get("peer")));

    // Legacy trojan-go style websocket switch
    let transport = if parse_flag(params.get("ws")) == Some(true) {
        Transport {
            network: Network::Ws,
            path: non_empty(params.get("wspath")),
            host: non_empty(params.get("host")),
            ..Default::default()
        }
    } else {
        Transport {
            network: Network::parse(params.get("type").map(String::as_str).unwrap_or("")),
            host: non_empty(params.get("host")),
            path: non_empty(params.get("path")),
            header_type: non_empty(params.get("headerType")).filter(|t| t != "none"),
            service_name: non_empty(params.get("serviceName")),
        }
    };

    Proxy::construct(
        url_remark(&url),
        host,
        port,
        ProxySettings::Trojan(TrojanProxy {
            password,
            transport,
            sni,
            allow_insecure: parse_flag(params.get("allowInsecure")),
        }),
    )
}
