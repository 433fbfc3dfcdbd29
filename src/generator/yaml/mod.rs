pub mod clash_output;

pub use clash_output::{
    ClashProxy, ClashProxyGroup, ClashYamlOutput, CommonProxyOptions, GrpcOptions, H2Options,
    HttpOptions, RealityOptions, TransportOptions, WsOptions,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_proxy_operations() {
        let mut ss_proxy = ClashProxy::Shadowsocks {
            common: CommonProxyOptions::builder(
                "example-ss".to_string(),
                "example.com".to_string(),
                8388,
            )
            .build(),
            cipher: "aes-256-gcm".to_string(),
            password: "password".to_string(),
            plugin: None,
            plugin_opts: None,
        };

        ss_proxy.common_mut().udp = Some(true);

        assert_eq!(ss_proxy.name(), "example-ss");
        assert_eq!(ss_proxy.common().udp, Some(true));
        assert_eq!(ss_proxy.common().skip_cert_verify, None);
    }

    #[test]
    fn test_proxy_serializes_with_type_tag_and_kebab_keys() {
        let proxy = ClashProxy::Vless {
            common: CommonProxyOptions::builder(
                "v".to_string(),
                "example.com".to_string(),
                443,
            )
            .tls(true)
            .client_fingerprint(Some("chrome".to_string()))
            .build(),
            uuid: "b831381d-6324-4d53-ad4f-8cda48b30811".to_string(),
            flow: None,
            reality_opts: Some(RealityOptions {
                public_key: "pbk".to_string(),
                short_id: None,
            }),
            transport: TransportOptions {
                network: Some("grpc".to_string()),
                grpc_opts: Some(GrpcOptions {
                    grpc_service_name: Some("svc".to_string()),
                }),
                ..Default::default()
            },
        };

        let value = serde_yaml::to_value(&proxy).unwrap();
        assert_eq!(value["type"], "vless");
        assert_eq!(value["port"], 443);
        assert_eq!(value["tls"], true);
        assert_eq!(value["client-fingerprint"], "chrome");
        assert_eq!(value["reality-opts"]["public-key"], "pbk");
        assert_eq!(value["grpc-opts"]["grpc-service-name"], "svc");
        assert!(value.get("flow").is_none());
        assert!(value.get("ws-opts").is_none());
    }

    #[test]
    fn test_group_type_names() {
        let group = ClashProxyGroup::UrlTest {
            name: "AUTO".to_string(),
            proxies: vec!["a".to_string()],
            url: "http://www.gstatic.com/generate_204".to_string(),
            interval: 300,
        };
        let value = serde_yaml::to_value(&group).unwrap();
        assert_eq!(value["type"], "url-test");
        assert_eq!(value["interval"], 300);
    }
}
