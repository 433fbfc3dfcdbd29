use super::common::{non_empty, parse_flag, parse_link_url, query_map, url_host, url_remark};
use crate::error::ExplodeError;
use crate::models::{Hysteria2Proxy, Proxy, ProxySettings};
use crate::utils::url::url_decode;

/// Parse a Hysteria2 link (`hysteria2://` or `hy2://`) into a Proxy object
///
/// Format: `hysteria2://[auth@]server[:port]/?sni=...&obfs=salamander&obfs-password=...#remark`
pub fn explode_hysteria2(hysteria2: &str) -> Result<Proxy, ExplodeError> {
    let url = parse_link_url(hysteria2)?;

    let host = url_host(&url)?;
    let port = url.port().unwrap_or(443);

    // Auth may be written as user:pass
    let password = match (url.username(), url.password()) {
        ("", None) => None,
        (user, None) => Some(url_decode(user)),
        (user, Some(pass)) => Some(format!("{}:{}", url_decode(user), url_decode(pass))),
    };

    let params = query_map(&url);

    let obfs = non_empty(params.get("obfs")).filter(|o| o != "none");
    let obfs_password = if obfs.is_some() {
        non_empty(params.get("obfs-password"))
    } else {
        None
    };

    let alpn = params
        .get("alpn")
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Proxy::construct(
        url_remark(&url),
        host,
        port,
        ProxySettings::Hysteria2(Hysteria2Proxy {
            password,
            sni: non_empty(params.get("sni")),
            obfs,
            obfs_password,
            allow_insecure: parse_flag(params.get("insecure")),
            up_mbps: params.get("up").and_then(|v| parse_mbps(v)),
            down_mbps: params.get("down").and_then(|v| parse_mbps(v)),
            alpn,
            ports: non_empty(params.get("mport")),
        }),
    )
}

/// Leading integer of a bandwidth value such as `100` or `100 Mbps`.
fn parse_mbps(value: &str) -> Option<u32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u32>().ok().filter(|v| *v > 0)
}
