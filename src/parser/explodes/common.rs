use std::collections::HashMap;

use log::debug;
use url::{Host, Url};

use crate::error::ExplodeError;
use crate::models::{DecodeOutcome, Proxy, ProxyType};
use crate::utils::url::url_decode;

type ExplodeFn = fn(&str) -> Result<Proxy, ExplodeError>;

/// Scheme prefix, protocol and decoder for every supported link type.
const EXPLODERS: &[(&str, ProxyType, ExplodeFn)] = &[
    ("ss://", ProxyType::Shadowsocks, super::ss::explode_ss),
    ("vmess://", ProxyType::VMess, super::vmess::explode_vmess),
    ("vless://", ProxyType::Vless, super::vless::explode_vless),
    ("trojan://", ProxyType::Trojan, super::trojan::explode_trojan),
    ("hysteria2://", ProxyType::Hysteria2, super::hysteria2::explode_hysteria2),
    ("hy2://", ProxyType::Hysteria2, super::hysteria2::explode_hysteria2),
];

/// Explode a single line into a decode outcome
///
/// Blank lines produce no outcome. Unknown schemes are errors; links of a
/// known scheme that fail to parse are warnings.
pub fn explode(line: &str) -> Option<DecodeOutcome> {
    let link = line.trim();
    if link.is_empty() {
        return None;
    }

    let Some((prefix, proxy_type, explode_fn)) = EXPLODERS
        .iter()
        .find(|(prefix, _, _)| has_scheme(link, prefix))
    else {
        debug!("Unsupported proxy type: {}", scheme_of(link));
        return Some(DecodeOutcome::Error {
            reason: "unrecognized scheme".to_string(),
        });
    };

    match explode_fn(link) {
        Ok(node) => Some(DecodeOutcome::Success(node)),
        Err(err) => {
            debug!("failed to parse {} link: {}", proxy_type.as_str(), err);
            Some(DecodeOutcome::Warning {
                scheme: prefix.trim_end_matches("://").to_string(),
                reason: err.to_string(),
            })
        }
    }
}

/// Case-insensitive check for a `scheme://` prefix.
pub(crate) fn has_scheme(link: &str, prefix: &str) -> bool {
    link.len() >= prefix.len()
        && link.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// The part after `prefix`, if the link carries it.
pub(crate) fn strip_scheme<'a>(link: &'a str, prefix: &str) -> Option<&'a str> {
    if has_scheme(link, prefix) {
        Some(&link[prefix.len()..])
    } else {
        None
    }
}

fn scheme_of(link: &str) -> &str {
    link.split("://").next().unwrap_or(link)
}

/// Split off a `#name` fragment, percent-decoding it.
pub(crate) fn split_fragment(content: &str) -> (&str, String) {
    match content.split_once('#') {
        Some((body, fragment)) => (body, url_decode(fragment)),
        None => (content, String::new()),
    }
}

/// Parse `host:port` or `[v6]:port`, ignoring a trailing `/`.
pub(crate) fn split_host_port(server: &str) -> Result<(String, u16), ExplodeError> {
    let server = server.trim().trim_end_matches('/');

    let (host, port) = if let Some(rest) = server.strip_prefix('[') {
        let (host, port) = rest.split_once(']').ok_or(ExplodeError::MissingHost)?;
        let port = port.strip_prefix(':').ok_or(ExplodeError::InvalidPort)?;
        (host, port)
    } else {
        server.rsplit_once(':').ok_or(ExplodeError::InvalidPort)?
    };

    if host.is_empty() {
        return Err(ExplodeError::MissingHost);
    }

    Ok((host.to_string(), parse_port(port)?))
}

pub(crate) fn parse_port(port: &str) -> Result<u16, ExplodeError> {
    match port.trim().parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(ExplodeError::InvalidPort),
    }
}

/// Parse a URL-shaped link, mapping parser failures onto decode errors.
pub(crate) fn parse_link_url(link: &str) -> Result<Url, ExplodeError> {
    Url::parse(link).map_err(|err| match err {
        url::ParseError::EmptyHost => ExplodeError::MissingHost,
        url::ParseError::InvalidPort => ExplodeError::InvalidPort,
        _ => ExplodeError::MalformedPayload,
    })
}

/// Host of a parsed link without IPv6 brackets.
pub(crate) fn url_host(url: &Url) -> Result<String, ExplodeError> {
    match url.host() {
        Some(Host::Ipv6(addr)) => Ok(addr.to_string()),
        Some(Host::Ipv4(addr)) => Ok(addr.to_string()),
        Some(Host::Domain(domain)) if !domain.is_empty() => Ok(url_decode(domain)),
        _ => Err(ExplodeError::MissingHost),
    }
}

pub(crate) fn query_map(url: &Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

/// Percent-decoded fragment of a parsed link.
pub(crate) fn url_remark(url: &Url) -> String {
    url.fragment().map(url_decode).unwrap_or_default()
}

pub(crate) fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

/// `1`/`true` and `0`/`false`; anything else is treated as absent.
pub(crate) fn parse_flag(value: Option<&String>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
