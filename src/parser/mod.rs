pub mod explodes;
pub mod registry;
pub mod subparser;

pub use explodes::explode;
pub use registry::NodeRegistry;
pub use subparser::{decode_lines, subscription_lines};
