use std::collections::BTreeMap;

use super::RuleProvider;

pub const DEFAULT_SELECTOR: &str = "PROXY";
pub const DEFAULT_URL_TEST: &str = "AUTO";
pub const DEFAULT_TEST_URL: &str = "http://www.gstatic.com/generate_204";
pub const DEFAULT_TEST_INTERVAL: u32 = 300;

const AD_RULE_BASE: &str = "https://raw.githubusercontent.com/earoftoast/clash-rules/main";
const AD_PROVIDERS: &[&str] = &["AD", "EasyList", "EasyListChina", "EasyPrivacy", "ProgramAD"];

/// Ad-blocking rule providers referenced by the default rules.
pub fn default_rule_providers() -> BTreeMap<String, RuleProvider> {
    AD_PROVIDERS
        .iter()
        .map(|name| {
            (
                name.to_string(),
                RuleProvider {
                    provider_type: "http".to_string(),
                    behavior: "domain".to_string(),
                    url: format!("{}/{}.yaml", AD_RULE_BASE, name),
                    path: format!("./rules/{}.yaml", name),
                    interval: 86400,
                },
            )
        })
        .collect()
}

pub fn default_rules() -> Vec<String> {
    let mut rules: Vec<String> = AD_PROVIDERS
        .iter()
        .map(|name| format!("RULE-SET,{},REJECT", name))
        .collect();

    // Local network
    rules.extend(
        [
            "DOMAIN-SUFFIX,local,DIRECT",
            "IP-CIDR,127.0.0.0/8,DIRECT",
            "IP-CIDR,192.168.0.0/16,DIRECT",
            "IP-CIDR,10.0.0.0/8,DIRECT",
            "IP-CIDR,172.16.0.0/12,DIRECT",
            "IP-CIDR6,::1/128,DIRECT",
            "IP-CIDR6,fc00::/7,DIRECT",
        ]
        .iter()
        .map(|r| r.to_string()),
    );

    for suffix in [
        "google.com",
        "github.com",
        "github.io",
        "githubusercontent.com",
        "youtube.com",
        "ytimg.com",
        "twitter.com",
        "facebook.com",
        "instagram.com",
        "whatsapp.com",
        "telegram.org",
        "openai.com",
        "cloudflare.com",
        "cloudfront.net",
        "akamai.net",
        "akamaiedge.net",
        "akamaihd.net",
    ] {
        rules.push(format!("DOMAIN-SUFFIX,{},{}", suffix, DEFAULT_SELECTOR));
        if suffix == "google.com" {
            rules.push(format!("DOMAIN-KEYWORD,google,{}", DEFAULT_SELECTOR));
        }
    }

    // Telegram
    for cidr in [
        "91.108.56.0/22",
        "91.108.4.0/22",
        "91.108.8.0/22",
        "91.108.16.0/22",
        "91.108.12.0/22",
        "149.154.160.0/20",
        "91.105.192.0/23",
        "91.108.20.0/22",
    ] {
        rules.push(format!("IP-CIDR,{},{}", cidr, DEFAULT_SELECTOR));
    }

    rules.push("GEOIP,CN,DIRECT".to_string());
    rules.push(format!("MATCH,{}", DEFAULT_SELECTOR));
    rules
}
