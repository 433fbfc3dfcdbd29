//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use subc::models::{Proxy, ProxySettings, TrojanProxy};
//!
//! let node = Proxy::construct(
//!     "example",
//!     "example.com",
//!     443,
//!     ProxySettings::Trojan(TrojanProxy {
//!         password: "secret".to_string(),
//!         ..Default::default()
//!     }),
//! )
//! .unwrap();
//! assert_eq!(node.server_address(), "example.com:443");
//! ```

mod outcome;
mod proxy;
pub mod proxy_node;

pub use outcome::*;
pub use proxy::*;
pub use proxy_node::{
    Hysteria2Proxy, Network, ShadowsocksProxy, Transport, TrojanProxy, VMessProxy, VlessProxy,
    VlessSecurity,
};
