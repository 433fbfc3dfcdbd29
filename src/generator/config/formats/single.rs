use log::info;
use serde_json::json;
use url::form_urlencoded::Serializer;

use crate::error::ConvertError;
use crate::generator::{EncodedDocument, ProxyEncoder};
use crate::models::{Network, Proxy, ProxySettings, Transport, VlessSecurity};
use crate::utils::base64::{base64_encode, url_safe_base64_encode};
use crate::utils::url::url_encode;

/// Convert a proxy back to its share link
///
/// Every supported node has a link form, so this never fails. Query
/// parameters are always written in the same order.
pub fn proxy_to_uri(node: &Proxy) -> String {
    let server = node.server_address();
    let remark = url_encode(&node.remark);

    match &node.settings {
        ProxySettings::Shadowsocks(ss) => {
            // Format: ss://BASE64URL(method:password)@server:port/?plugin=plugin;opts#remark
            let user_info = url_safe_base64_encode(&format!("{}:{}", ss.method, ss.password));
            let mut uri = format!("ss://{}@{}", user_info, server);

            if let Some(plugin) = &ss.plugin {
                let plugin = match &ss.plugin_opts {
                    Some(opts) => format!("{};{}", plugin, opts),
                    None => plugin.clone(),
                };
                uri.push_str(&format!("/?plugin={}", url_encode(&plugin)));
            }

            uri.push_str(&format!("#{}", remark));
            uri
        }
        ProxySettings::VMess(vmess) => {
            // Format: vmess://BASE64(JSON)
            let vmess_json = json!({
                "v": "2",
                "ps": node.remark,
                "add": node.hostname,
                "port": node.port,
                "id": vmess.uuid,
                "aid": vmess.alter_id,
                "scy": vmess.cipher,
                "net": vmess.transport.network.as_str(),
                "type": vmess.transport.header_type.as_deref().unwrap_or("none"),
                "host": vmess.transport.host.as_deref().unwrap_or(""),
                "path": vmess.transport.path.as_deref()
                    .or(vmess.transport.service_name.as_deref())
                    .unwrap_or(""),
                "tls": if vmess.tls { "tls" } else { "" },
                "sni": vmess.sni.as_deref().unwrap_or(""),
            });

            format!("vmess://{}", base64_encode(&vmess_json.to_string()))
        }
        ProxySettings::Vless(vless) => {
            let mut query = Serializer::new(String::new());
            query.append_pair("encryption", "none");
            if let Some(flow) = &vless.flow {
                query.append_pair("flow", flow);
            }
            if vless.security != VlessSecurity::None {
                query.append_pair("security", vless.security.as_str());
            }
            if let Some(sni) = &vless.sni {
                query.append_pair("sni", sni);
            }
            if let Some(fp) = &vless.fingerprint {
                query.append_pair("fp", fp);
            }
            if let VlessSecurity::Reality {
                public_key,
                short_id,
            } = &vless.security
            {
                query.append_pair("pbk", public_key);
                if let Some(sid) = short_id {
                    query.append_pair("sid", sid);
                }
            }
            append_transport(&mut query, &vless.transport);

            format!(
                "vless://{}@{}?{}#{}",
                url_encode(&vless.uuid),
                server,
                query.finish(),
                remark
            )
        }
        ProxySettings::Trojan(trojan) => {
            // Format: trojan://password@server:port?sni=sni&allowInsecure=1#remark
            let mut query = Serializer::new(String::new());
            if let Some(sni) = &trojan.sni {
                query.append_pair("sni", sni);
            }
            if let Some(insecure) = trojan.allow_insecure {
                query.append_pair("allowInsecure", if insecure { "1" } else { "0" });
            }
            append_transport(&mut query, &trojan.transport);

            let mut uri = format!("trojan://{}@{}", url_encode(&trojan.password), server);
            let query = query.finish();
            if !query.is_empty() {
                uri.push('?');
                uri.push_str(&query);
            }
            uri.push_str(&format!("#{}", remark));
            uri
        }
        ProxySettings::Hysteria2(hy2) => {
            let mut query = Serializer::new(String::new());
            if let Some(sni) = &hy2.sni {
                query.append_pair("sni", sni);
            }
            if let Some(insecure) = hy2.allow_insecure {
                query.append_pair("insecure", if insecure { "1" } else { "0" });
            }
            if let Some(obfs) = &hy2.obfs {
                query.append_pair("obfs", obfs);
                if let Some(password) = &hy2.obfs_password {
                    query.append_pair("obfs-password", password);
                }
            }
            if let Some(up) = hy2.up_mbps {
                query.append_pair("up", &up.to_string());
            }
            if let Some(down) = hy2.down_mbps {
                query.append_pair("down", &down.to_string());
            }
            if !hy2.alpn.is_empty() {
                query.append_pair("alpn", &hy2.alpn.join(","));
            }
            if let Some(ports) = &hy2.ports {
                query.append_pair("mport", ports);
            }

            let mut uri = String::from("hysteria2://");
            if let Some(password) = &hy2.password {
                uri.push_str(&url_encode(password));
                uri.push('@');
            }
            uri.push_str(&server);

            let query = query.finish();
            if !query.is_empty() {
                uri.push_str("/?");
                uri.push_str(&query);
            }
            uri.push_str(&format!("#{}", remark));
            uri
        }
    }
}

fn append_transport(query: &mut Serializer<'_, String>, transport: &Transport) {
    if transport.network != Network::Tcp {
        query.append_pair("type", transport.network.as_str());
    }
    if let Some(host) = &transport.host {
        query.append_pair("host", host);
    }
    if let Some(path) = &transport.path {
        query.append_pair("path", path);
    }
    if let Some(header_type) = &transport.header_type {
        query.append_pair("headerType", header_type);
    }
    if let Some(service_name) = &transport.service_name {
        query.append_pair("serviceName", service_name);
    }
}

/// Convert proxies to a newline separated link list
pub fn proxy_to_single(nodes: &[Proxy]) -> String {
    let mut result = String::new();

    for node in nodes {
        result.push_str(&proxy_to_uri(node));
        result.push('\n');
    }

    result
}

/// Encodes nodes as a link list, optionally wrapped in one Base64 body.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkListEncoder {
    pub wrap: bool,
}

impl LinkListEncoder {
    pub fn new(wrap: bool) -> Self {
        LinkListEncoder { wrap }
    }
}

impl ProxyEncoder for LinkListEncoder {
    fn encode(&self, nodes: &[Proxy]) -> Result<EncodedDocument, ConvertError> {
        let links = proxy_to_single(nodes);
        let text = if self.wrap {
            base64_encode(&links)
        } else {
            links
        };

        info!("generated {} links", nodes.len());

        Ok(EncodedDocument {
            text,
            emitted: nodes.len(),
            skipped: Vec::new(),
        })
    }
}
