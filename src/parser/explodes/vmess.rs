use serde_json::Value;

use super::common::{split_fragment, strip_scheme};
use crate::error::ExplodeError;
use crate::models::{Network, Proxy, ProxySettings, Transport, VMessProxy};
use crate::utils::base64::base64_decode;

/// Parse a VMess link (`vmess://BASE64(JSON)`) into a Proxy object
pub fn explode_vmess(vmess: &str) -> Result<Proxy, ExplodeError> {
    let encoded = strip_scheme(vmess, "vmess://").ok_or(ExplodeError::MalformedPayload)?;
    let (encoded, fragment) = split_fragment(encoded);

    let decoded = base64_decode(encoded).ok_or(ExplodeError::InvalidBase64)?;
    let json: Value = serde_json::from_str(&decoded).map_err(|_| ExplodeError::InvalidJson)?;
    if !json.is_object() {
        return Err(ExplodeError::InvalidJson);
    }

    let add = json_str(&json, "add");
    let port = json_u16(&json["port"]).ok_or(ExplodeError::InvalidPort)?;

    let id = json_str(&json, "id");
    if id.is_empty() {
        return Err(ExplodeError::MissingCredential);
    }
    let aid = json_u16(&json["aid"]).unwrap_or(0);

    let cipher = match json_str(&json, "scy") {
        "" => "auto",
        scy => scy,
    };

    let transport = Transport {
        network: Network::parse(json_str(&json, "net")),
        host: non_empty(json_str(&json, "host")),
        path: non_empty(json_str(&json, "path")),
        header_type: non_empty(json_str(&json, "type")).filter(|t| t != "none"),
        service_name: None,
    };

    // The payload name wins over a trailing fragment
    let remark = match json_str(&json, "ps") {
        "" => fragment,
        ps => ps.to_string(),
    };

    Proxy::construct(
        remark,
        add,
        port,
        ProxySettings::VMess(VMessProxy {
            uuid: id.to_string(),
            alter_id: aid,
            cipher: cipher.to_string(),
            transport,
            tls: json_str(&json, "tls").eq_ignore_ascii_case("tls"),
            sni: non_empty(json_str(&json, "sni")),
        }),
    )
}

fn json_str<'a>(json: &'a Value, key: &str) -> &'a str {
    json.get(key).and_then(Value::as_str).unwrap_or("").trim()
}

/// Port and alterId are written both as numbers and as strings in the wild.
fn json_u16(value: &Value) -> Option<u16> {
    let number = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u16::try_from(number).ok()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
