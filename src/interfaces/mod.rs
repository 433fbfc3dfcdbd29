pub mod converter;

pub use converter::{
    convert_content, convert_lines, encode_registry, encoder_for, Conversion, ConversionReport,
    ConversionRequest, ConversionState, ConversionTarget, ConvertOptions, Converter,
};
