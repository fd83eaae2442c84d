//! Tolerant UTF-8 decoding of raw feed payloads.

/// Feed text with invalid byte sequences removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub text: String,
    /// Number of bytes that were not valid UTF-8 and got dropped
    pub dropped_bytes: usize,
}

impl DecodedPayload {
    /// Whether any bytes were discarded while decoding.
    pub fn is_lossy(&self) -> bool {
        self.dropped_bytes > 0
    }
}

/// Decode a payload as UTF-8, dropping undecodable sequences instead of
/// failing or substituting replacement characters.
pub fn decode_payload(bytes: &[u8]) -> DecodedPayload {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped_bytes = 0;

    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped_bytes += chunk.invalid().len();
    }

    DecodedPayload {
        text,
        dropped_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_payload() {
        let decoded = decode_payload("LOCATION:Б-204".as_bytes());
        assert_eq!(decoded.text, "LOCATION:Б-204");
        assert!(!decoded.is_lossy());
    }

    #[test]
    fn test_invalid_bytes_are_dropped() {
        let mut bytes = b"LOCATION:".to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice("Б".as_bytes());
        bytes.extend_from_slice(&[0xD0]); // truncated two-byte sequence

        let decoded = decode_payload(&bytes);
        assert_eq!(decoded.text, "LOCATION:Б");
        assert_eq!(decoded.dropped_bytes, 2);
        assert!(decoded.is_lossy());
    }

    #[test]
    fn test_empty_payload() {
        let decoded = decode_payload(&[]);
        assert!(decoded.text.is_empty());
        assert!(!decoded.is_lossy());
    }
}
