use std::collections::{BTreeMap, HashSet};

use log::{info, warn};
use serde_yaml::Value as YamlValue;

use crate::error::{ConvertError, EncodeWarning};
use crate::generator::yaml::{
    ClashProxy, ClashProxyGroup, ClashYamlOutput, CommonProxyOptions, GrpcOptions, H2Options,
    HttpOptions, RealityOptions, TransportOptions, WsOptions,
};
use crate::generator::{EncodedDocument, ProxyEncoder};
use crate::models::{Network, Proxy, ProxySettings, Transport, VlessSecurity};
use crate::settings::{ProxyOptions, Settings, DEFAULT_SELECTOR};

/// Shadowsocks ciphers understood by Clash cores
const CLASH_SS_CIPHERS: &[&str] = &[
    "aes-128-gcm",
    "aes-192-gcm",
    "aes-256-gcm",
    "aes-128-cfb",
    "aes-192-cfb",
    "aes-256-cfb",
    "aes-128-ctr",
    "aes-192-ctr",
    "aes-256-ctr",
    "rc4-md5",
    "chacha20",
    "chacha20-ietf",
    "xchacha20",
    "chacha20-ietf-poly1305",
    "xchacha20-ietf-poly1305",
    "2022-blake3-aes-128-gcm",
    "2022-blake3-aes-256-gcm",
    "2022-blake3-chacha20-poly1305",
    "none",
];

/// Convert a proxy to its Clash representation under the given name
///
/// Returns an [`EncodeWarning`] when the node uses something Clash cannot
/// express (an unknown cipher or plugin, or a kcp/quic transport).
pub fn proxy_to_clash(
    node: &Proxy,
    name: &str,
    options: &ProxyOptions,
) -> Result<ClashProxy, EncodeWarning> {
    let builder =
        CommonProxyOptions::builder(name.to_string(), node.hostname.clone(), node.port);
    let insecure = |flag: Option<bool>| flag.or(options.insecure_by_default.then_some(true));

    let mut proxy = match &node.settings {
        ProxySettings::Shadowsocks(ss) => {
            let cipher = ss.method.to_ascii_lowercase();
            if !CLASH_SS_CIPHERS.contains(&cipher.as_str()) {
                return Err(EncodeWarning::unsupported(
                    name,
                    format!("unsupported cipher {}", ss.method),
                ));
            }

            let (plugin, plugin_opts) = match ss.plugin.as_deref() {
                Some(plugin) => {
                    let (plugin, opts) =
                        clash_plugin(plugin, ss.plugin_opts.as_deref().unwrap_or(""))
                            .ok_or_else(|| {
                                EncodeWarning::unsupported(
                                    name,
                                    format!("unsupported plugin {}", plugin),
                                )
                            })?;
                    (Some(plugin), Some(opts))
                }
                None => (None, None),
            };

            ClashProxy::Shadowsocks {
                common: builder.build(),
                cipher,
                password: ss.password.clone(),
                plugin,
                plugin_opts,
            }
        }
        ProxySettings::VMess(vmess) => ClashProxy::VMess {
            common: builder
                .tls(vmess.tls)
                .servername(vmess.sni.clone())
                .build(),
            uuid: vmess.uuid.clone(),
            alter_id: vmess.alter_id,
            cipher: if vmess.cipher.is_empty() {
                "auto".to_string()
            } else {
                vmess.cipher.clone()
            },
            transport: transport_options(name, &vmess.transport)?,
        },
        ProxySettings::Vless(vless) => {
            let reality_opts = match &vless.security {
                VlessSecurity::Reality {
                    public_key,
                    short_id,
                } => Some(RealityOptions {
                    public_key: public_key.clone(),
                    short_id: short_id.clone(),
                }),
                _ => None,
            };

            let mut transport = transport_options(name, &vless.transport)?;
            transport.network.get_or_insert_with(|| "tcp".to_string());

            ClashProxy::Vless {
                common: builder
                    .tls(vless.security.is_tls())
                    .skip_cert_verify(insecure(None))
                    .servername(vless.sni.clone())
                    .client_fingerprint(vless.fingerprint.clone())
                    .build(),
                uuid: vless.uuid.clone(),
                flow: vless.flow.clone(),
                reality_opts,
                transport,
            }
        }
        ProxySettings::Trojan(trojan) => {
            if !matches!(
                trojan.transport.network,
                Network::Tcp | Network::Ws | Network::Grpc
            ) {
                return Err(EncodeWarning::unsupported(
                    name,
                    format!(
                        "unsupported trojan network {}",
                        trojan.transport.network.as_str()
                    ),
                ));
            }

            ClashProxy::Trojan {
                common: builder
                    .sni(trojan.sni.clone())
                    .skip_cert_verify(insecure(trojan.allow_insecure))
                    .build(),
                password: trojan.password.clone(),
                transport: transport_options(name, &trojan.transport)?,
            }
        }
        ProxySettings::Hysteria2(hy2) => ClashProxy::Hysteria2 {
            common: builder
                .sni(hy2.sni.clone())
                .skip_cert_verify(insecure(hy2.allow_insecure))
                .build(),
            password: hy2.password.clone(),
            ports: hy2.ports.clone(),
            up: hy2.up_mbps.map(|up| format!("{} Mbps", up)),
            down: hy2.down_mbps.map(|down| format!("{} Mbps", down)),
            obfs: hy2.obfs.clone(),
            obfs_password: hy2.obfs_password.clone(),
            alpn: hy2.alpn.clone(),
        },
    };

    // Global overrides from settings
    let common = proxy.common_mut();
    if options.udp.is_some() {
        common.udp = options.udp;
    }
    if options.skip_cert_verify.is_some() {
        common.skip_cert_verify = options.skip_cert_verify;
    }

    Ok(proxy)
}

/// Map a SIP003 plugin to Clash's `plugin` and `plugin-opts`.
fn clash_plugin(plugin: &str, opts: &str) -> Option<(String, BTreeMap<String, YamlValue>)> {
    let args = plugin_args(opts);
    let mut plugin_opts = BTreeMap::new();

    match plugin {
        "obfs-local" | "simple-obfs" => {
            let mode = args.get("obfs").map(String::as_str).unwrap_or("http");
            plugin_opts.insert("mode".to_string(), YamlValue::from(mode));
            if let Some(host) = args.get("obfs-host") {
                plugin_opts.insert("host".to_string(), YamlValue::from(host.as_str()));
            }
            Some(("obfs".to_string(), plugin_opts))
        }
        "v2ray-plugin" => {
            let mode = args.get("mode").map(String::as_str).unwrap_or("websocket");
            plugin_opts.insert("mode".to_string(), YamlValue::from(mode));
            plugin_opts.insert("tls".to_string(), YamlValue::from(args.contains_key("tls")));
            for key in ["host", "path"] {
                if let Some(value) = args.get(key) {
                    plugin_opts.insert(key.to_string(), YamlValue::from(value.as_str()));
                }
            }
            if args.contains_key("mux") {
                plugin_opts.insert("mux".to_string(), YamlValue::from(true));
            }
            Some(("v2ray-plugin".to_string(), plugin_opts))
        }
        _ => None,
    }
}

/// `obfs=http;obfs-host=a.com;tls` → {obfs: http, obfs-host: a.com, tls: ""}
fn plugin_args(opts: &str) -> BTreeMap<String, String> {
    opts.split(';')
        .map(str::trim)
        .filter(|arg| !arg.is_empty())
        .map(|arg| match arg.split_once('=') {
            Some((key, value)) => (key.trim().to_string(), value.trim().to_string()),
            None => (arg.to_string(), String::new()),
        })
        .collect()
}

fn transport_options(name: &str, transport: &Transport) -> Result<TransportOptions, EncodeWarning> {
    let mut options = TransportOptions::default();

    match &transport.network {
        Network::Tcp => {
            // Raw tcp with an http header disguise is Clash's http network
            if transport.header_type.as_deref() == Some("http") {
                options.network = Some("http".to_string());
                options.http_opts = Some(http_options(transport));
            }
        }
        Network::Ws => {
            options.network = Some("ws".to_string());
            let mut headers = BTreeMap::new();
            if let Some(host) = &transport.host {
                headers.insert("Host".to_string(), host.clone());
            }
            options.ws_opts = Some(WsOptions {
                path: transport.path.clone(),
                headers,
            });
        }
        Network::Http => {
            options.network = Some("http".to_string());
            options.http_opts = Some(http_options(transport));
        }
        Network::H2 => {
            options.network = Some("h2".to_string());
            options.h2_opts = Some(H2Options {
                host: split_hosts(transport.host.as_deref()),
                path: transport.path.clone(),
            });
        }
        Network::Grpc => {
            options.network = Some("grpc".to_string());
            options.grpc_opts = Some(GrpcOptions {
                grpc_service_name: transport
                    .service_name
                    .clone()
                    .or_else(|| transport.path.clone()),
            });
        }
        other => {
            return Err(EncodeWarning::unsupported(
                name,
                format!("unsupported network {}", other.as_str()),
            ));
        }
    }

    Ok(options)
}

fn http_options(transport: &Transport) -> HttpOptions {
    let mut headers = BTreeMap::new();
    let hosts = split_hosts(transport.host.as_deref());
    if !hosts.is_empty() {
        headers.insert("Host".to_string(), hosts);
    }
    HttpOptions {
        method: "GET".to_string(),
        path: vec![transport.path.clone().unwrap_or_else(|| "/".to_string())],
        headers,
    }
}

fn split_hosts(hosts: Option<&str>) -> Vec<String> {
    hosts
        .map(|hosts| {
            hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Make `name` unique among `used` by appending ` 2`, ` 3`, ...
fn unique_name(name: &str, used: &HashSet<String>) -> String {
    if !used.contains(name) {
        return name.to_string();
    }
    let mut index = 2;
    loop {
        let candidate = format!("{} {}", name, index);
        if !used.contains(&candidate) {
            return candidate;
        }
        index += 1;
    }
}

/// Point rules at the configured selector and make sure a catch-all exists.
fn finalize_rules(rules: &[String], selector: &str) -> Vec<String> {
    let mut finalized: Vec<String> = rules
        .iter()
        .map(|rule| {
            let mut fields: Vec<&str> = rule.split(',').collect();
            let policy = if fields[0].trim().eq_ignore_ascii_case("MATCH") {
                1
            } else {
                2
            };
            let retarget = selector != DEFAULT_SELECTOR
                && fields.get(policy).map_or(false, |target| *target == DEFAULT_SELECTOR);
            if retarget {
                fields[policy] = selector;
                fields.join(",")
            } else {
                rule.clone()
            }
        })
        .collect();

    let has_match = finalized
        .iter()
        .any(|rule| rule.trim().to_ascii_uppercase().starts_with("MATCH,"));
    if !has_match {
        finalized.push(format!("MATCH,{}", selector));
    }
    finalized
}

/// Encodes nodes into a complete Clash configuration document.
pub struct ClashEncoder<'a> {
    settings: &'a Settings,
}

impl<'a> ClashEncoder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        ClashEncoder { settings }
    }

    /// Build the document without serializing it.
    pub fn build(&self, nodes: &[Proxy]) -> (ClashYamlOutput, Vec<EncodeWarning>) {
        let settings = self.settings;
        let mut used = HashSet::new();
        let mut proxies = Vec::with_capacity(nodes.len());
        let mut skipped = Vec::new();

        for node in nodes {
            let name = unique_name(&node.remark, &used);
            match proxy_to_clash(node, &name, &settings.proxy) {
                Ok(proxy) => {
                    used.insert(name);
                    proxies.push(proxy);
                }
                Err(warning) => {
                    warn!("skipped node {}", warning);
                    skipped.push(warning);
                }
            }
        }

        let names: Vec<String> = proxies.iter().map(|p| p.name().to_string()).collect();
        let groups = &settings.groups;

        let mut selector_members = Vec::with_capacity(names.len() + 1);
        if groups.selector_include_direct {
            selector_members.push("DIRECT".to_string());
        }
        selector_members.extend(names.iter().cloned());

        let mut proxy_groups = vec![ClashProxyGroup::Select {
            name: groups.selector_name.clone(),
            proxies: selector_members,
        }];
        if groups.url_test {
            proxy_groups.push(ClashProxyGroup::UrlTest {
                name: groups.url_test_name.clone(),
                proxies: names,
                url: groups.test_url.clone(),
                interval: groups.interval,
            });
        }

        let general = &settings.general;
        let output = ClashYamlOutput {
            port: general.port,
            socks_port: general.socks_port,
            redir_port: general.redir_port,
            mixed_port: general.mixed_port,
            allow_lan: general.allow_lan,
            mode: general.mode.clone(),
            log_level: general.log_level.clone(),
            external_controller: general.external_controller.clone(),
            proxies,
            proxy_groups,
            rule_providers: settings.rule_providers.clone(),
            rules: finalize_rules(&settings.rules, &groups.selector_name),
        };

        (output, skipped)
    }
}

impl ProxyEncoder for ClashEncoder<'_> {
    fn encode(&self, nodes: &[Proxy]) -> Result<EncodedDocument, ConvertError> {
        let (output, skipped) = self.build(nodes);
        let emitted = output.proxies.len();
        let text = serde_yaml::to_string(&output)?;

        info!(
            "generated clash config with {} proxies ({} skipped)",
            emitted,
            skipped.len()
        );

        Ok(EncodedDocument {
            text,
            emitted,
            skipped,
        })
    }
}
