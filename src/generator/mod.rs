pub mod config;
pub mod yaml;

use crate::error::{ConvertError, EncodeWarning};
use crate::models::Proxy;

// Re-export format converters
pub use config::formats::clash::{proxy_to_clash, ClashEncoder};
pub use config::formats::single::{proxy_to_single, proxy_to_uri, LinkListEncoder};

/// Result of encoding a node list into one target document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedDocument {
    pub text: String,
    /// Number of nodes written into `text`
    pub emitted: usize,
    pub skipped: Vec<EncodeWarning>,
}

/// Serializes decoded nodes into a target document.
///
/// Nodes the target cannot represent are reported in
/// [`EncodedDocument::skipped`]; they never fail the whole encode.
pub trait ProxyEncoder {
    fn encode(&self, nodes: &[Proxy]) -> Result<EncodedDocument, ConvertError>;
}
