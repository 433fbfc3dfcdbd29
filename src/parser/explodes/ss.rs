use super::common::{split_fragment, split_host_port, strip_scheme};
use crate::error::ExplodeError;
use crate::models::{Proxy, ProxySettings, ShadowsocksProxy};
use crate::utils::base64::base64_decode;
use crate::utils::url::url_decode;

/// Parse a Shadowsocks link into a Proxy object
///
/// Accepts SIP002 (`ss://BASE64(method:password)@server:port/?plugin=...#remark`),
/// SIP002 with a plain `method:password` userinfo, and the legacy
/// `ss://BASE64(method:password@server:port)#remark` layout.
pub fn explode_ss(ss: &str) -> Result<Proxy, ExplodeError> {
    let content = strip_scheme(ss, "ss://").ok_or(ExplodeError::MalformedPayload)?;
    let content = content.replace("/?", "?");

    // Extract fragment (remark) if present
    let (content, remark) = split_fragment(&content);

    // Extract plugin from the query string
    let (content, query) = match content.split_once('?') {
        Some((main, query)) => (main, Some(query)),
        None => (content, None),
    };
    let (plugin, plugin_opts) = query.map(parse_plugin).unwrap_or((None, None));

    let (secret, server_port) = match content.rsplit_once('@') {
        Some((userinfo, server_port)) => {
            // Base64 never contains ':', so a colon means a plain userinfo
            let secret = if userinfo.contains(':') {
                url_decode(userinfo)
            } else {
                base64_decode(&url_decode(userinfo)).ok_or(ExplodeError::InvalidBase64)?
            };
            (secret, server_port.to_string())
        }
        None => {
            let decoded = base64_decode(content).ok_or(ExplodeError::InvalidBase64)?;
            let (secret, server_port) = decoded
                .rsplit_once('@')
                .ok_or(ExplodeError::MalformedPayload)?;
            (secret.to_string(), server_port.to_string())
        }
    };

    // Password may itself contain colons
    let (method, password) = secret
        .split_once(':')
        .ok_or(ExplodeError::MissingCredential)?;
    if method.trim().is_empty() {
        return Err(ExplodeError::MissingCredential);
    }

    let (hostname, port) = split_host_port(&server_port)?;

    Proxy::construct(
        remark,
        hostname,
        port,
        ProxySettings::Shadowsocks(ShadowsocksProxy {
            method: method.trim().to_string(),
            password: password.to_string(),
            plugin,
            plugin_opts,
        }),
    )
}

/// `plugin=name;opt=a;opt2=b` → (`name`, `opt=a;opt2=b`)
fn parse_plugin(query: &str) -> (Option<String>, Option<String>) {
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if key != "plugin" || value.trim().is_empty() {
            continue;
        }
        return match value.split_once(';') {
            Some((name, opts)) if !opts.is_empty() => {
                (Some(name.to_string()), Some(opts.to_string()))
            }
            Some((name, _)) => (Some(name.to_string()), None),
            None => (Some(value.into_owned()), None),
        };
    }

    (None, None)
}
