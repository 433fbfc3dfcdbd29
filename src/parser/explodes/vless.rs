use super::common::{non_empty, parse_link_url, query_map, url_host, url_remark};
use crate::error::ExplodeError;
use crate::models::{Network, Proxy, ProxySettings, Transport, VlessProxy, VlessSecurity};
use crate::utils::url::url_decode;

/// Parse a VLESS link into a Proxy object
///
/// Format: `vless://uuid@server:port?type=ws&security=tls&sni=...&path=...#remark`
pub fn explode_vless(vless: &str) -> Result<Proxy, ExplodeError> {
    let url = parse_link_url(vless)?;

    let uuid = url_decode(url.username());
    if uuid.trim().is_empty() {
        return Err(ExplodeError::MissingCredential);
    }

    let host = url_host(&url)?;
    let port = url.port().ok_or(ExplodeError::InvalidPort)?;

    let params = query_map(&url);

    let security = match params
        .get("security")
        .map(|s| s.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("reality") => VlessSecurity::Reality {
            public_key: non_empty(params.get("pbk")).ok_or(ExplodeError::MalformedPayload)?,
            short_id: non_empty(params.get("sid")),
        },
        Some("tls") | Some("xtls") => VlessSecurity::Tls,
        _ => VlessSecurity::None,
    };

    let transport = Transport {
        network: Network::parse(params.get("type").map(String::as_str).unwrap_or("")),
        host: non_empty(params.get("host")),
        path: non_empty(params.get("path")),
        header_type: non_empty(params.get("headerType")).filter(|t| t != "none"),
        service_name: non_empty(params.get("serviceName")),
    };

    Proxy::construct(
        url_remark(&url),
        host,
        port,
        ProxySettings::Vless(VlessProxy {
            uuid: uuid.trim().to_string(),
            flow: non_empty(params.get("flow")),
            transport,
            security,
            sni: non_empty(params.get("sni")),
            fingerprint: non_empty(params.get("fp")),
        }),
    )
}
