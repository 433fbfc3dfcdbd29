pub mod error;
pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;

// Re-export the main proxy types for easier access
pub use models::{Proxy, ProxyType};

pub use error::{ConvertError, EncodeWarning, ExplodeError};
pub use interfaces::{
    ConversionReport, ConversionRequest, ConversionState, ConversionTarget, ConvertOptions,
    Converter,
};
pub use settings::Settings;
