//! Data URL packaging
//!
//! Listing photos are persisted inline as `data:<mime>;base64,<payload>`
//! strings in database text columns. This module converts between that
//! representation and raw image bytes.

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const WEBP_PREFIX: &str = "data:image/webp;base64,";

/// Package optimized WebP bytes as a data URL ready for a text column.
pub fn encode_webp(bytes: &[u8]) -> String {
    format!("{}{}", WEBP_PREFIX, STANDARD.encode(bytes))
}

/// Whether the value is an inline image at all (as opposed to an
/// object-storage URL or other reference).
pub fn is_image(url: &str) -> bool {
    url.starts_with("data:image/")
}

/// Whether the value is already in the optimized WebP representation.
pub fn is_webp(url: &str) -> bool {
    url.starts_with("data:image/webp")
}

/// Split a data URL into its mime type and decoded payload bytes.
pub fn decode(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::DataUrl("Missing data: scheme".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::DataUrl("Missing payload separator".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::DataUrl("Only base64 payloads are supported".to_string()))?;

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::DataUrl(format!("Invalid base64 payload: {}", e)))?;

    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let bytes = vec![0x52, 0x49, 0x46, 0x46, 0x00, 0x01, 0x02];
        let url = encode_webp(&bytes);

        assert!(url.starts_with("data:image/webp;base64,"));
        assert!(is_webp(&url));
        assert!(is_image(&url));

        let (mime, decoded) = decode(&url).unwrap();
        assert_eq!(mime, "image/webp");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_decode_rejects_plain_urls() {
        let err = decode("https://cdn.example.com/photo.jpg").unwrap_err();
        assert!(matches!(err, Error::DataUrl(_)));
    }

    #[test]
    fn test_decode_rejects_non_base64_encoding() {
        let err = decode("data:text/plain,hello").unwrap_err();
        assert!(matches!(err, Error::DataUrl(_)));
    }

    #[test]
    fn test_decode_rejects_bad_payload() {
        let err = decode("data:image/png;base64,not-valid-base64!!!").unwrap_err();
        assert!(matches!(err, Error::DataUrl(_)));
    }

    #[test]
    fn test_is_webp_distinguishes_other_images() {
        assert!(!is_webp("data:image/png;base64,AAAA"));
        assert!(is_image("data:image/png;base64,AAAA"));
        assert!(!is_image("https://cdn.example.com/photo.webp"));
    }
}
