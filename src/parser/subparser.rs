use log::debug;

use super::explodes::explode;
use super::registry::NodeRegistry;
use crate::utils::base64::{base64_decode, is_base64_body};

/// Split a subscription body into raw lines
///
/// A body that is one Base64 blob (the usual subscription delivery format) is
/// unwrapped first. Blank lines are kept so that line numbers stay accurate.
pub fn subscription_lines(content: &str) -> Vec<String> {
    let content = content.trim_start_matches('\u{feff}');

    if is_base64_body(content) {
        if let Some(decoded) = base64_decode(content) {
            if decoded.contains("://") {
                debug!("unwrapped base64 subscription body");
                return decoded.lines().map(str::to_string).collect();
            }
        }
    }

    content.lines().map(str::to_string).collect()
}

/// Decode every line into a fresh registry, in input order.
pub fn decode_lines<'a, I>(lines: I) -> NodeRegistry
where
    I: IntoIterator<Item = &'a str>,
{
    let mut registry = NodeRegistry::new();

    for (index, line) in lines.into_iter().enumerate() {
        if let Some(outcome) = explode(line) {
            registry.record(index + 1, outcome);
        }
    }

    registry
}
