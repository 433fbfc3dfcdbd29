use base64::alphabet;
use base64::engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;

/// Standard alphabet engine that accepts input with or without padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

static BASE64_BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+/_\-=\s]+$").unwrap()
});

/// Encodes a string to Base64 format.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Encodes a string to URL-safe Base64 format without padding.
pub fn url_safe_base64_encode(input: &str) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(input)
}

/// Reverses a URL-safe Base64 string to standard Base64 format.
pub fn url_safe_base64_reverse(input: &str) -> String {
    input.replace('-', "+").replace('_', "/")
}

/// Decodes a Base64 string (standard or URL-safe, padding optional) into UTF-8 text.
///
/// Returns `None` if the input is not Base64 or does not decode to valid UTF-8.
pub fn base64_decode(input: &str) -> Option<String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let bytes = LENIENT.decode(url_safe_base64_reverse(&compact)).ok()?;
    String::from_utf8(bytes).ok()
}

/// Whether a whole subscription body looks like a single Base64 blob.
pub fn is_base64_body(content: &str) -> bool {
    let trimmed = content.trim();
    !trimmed.is_empty() && !trimmed.contains("://") && BASE64_BODY.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_without_padding() {
        // "aes-256-gcm:pass" padded is "YWVzLTI1Ni1nY206cGFzcw=="
        assert_eq!(
            base64_decode("YWVzLTI1Ni1nY206cGFzcw"),
            Some("aes-256-gcm:pass".to_string())
        );
        assert_eq!(
            base64_decode("YWVzLTI1Ni1nY206cGFzcw=="),
            Some("aes-256-gcm:pass".to_string())
        );
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        let encoded = url_safe_base64_encode("??>>");
        assert!(encoded.contains('_') || encoded.contains('-'));
        assert_eq!(base64_decode(&encoded), Some("??>>".to_string()));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(base64_decode("not base64!"), None);
        assert_eq!(base64_decode(""), None);
    }

    #[test]
    fn test_is_base64_body() {
        assert!(is_base64_body("c3M6Ly9hYmM=\n"));
        assert!(!is_base64_body("ss://abc"));
        assert!(!is_base64_body("   "));
    }
}
