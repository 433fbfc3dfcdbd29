pub mod clash;
pub mod single;

// Re-export all format converters
pub use clash::{proxy_to_clash, ClashEncoder};
pub use single::{proxy_to_single, proxy_to_uri, LinkListEncoder};
