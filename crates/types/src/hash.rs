//! Content hash type using Blake3.

use serde_json::Value;
use std::fmt;

/// A 32-byte BLAKE3 digest of a message body.
///
/// Two messages with the same content hash are treated as the same logical
/// message. Hashing is deterministic: JSON values are hashed through their
/// canonical `serde_json` encoding, whose object keys are always sorted.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create hash from bytes using Blake3.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hash = blake3::hash(bytes);
        Self(*hash.as_bytes())
    }

    /// Hash a JSON value through its canonical encoding.
    pub fn of_json(value: &Value) -> Self {
        Self::from_bytes(value.to_string().as_bytes())
    }

    /// Convert hash to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short form used in log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "ContentHash({}..{})", &hex[..8], &hex[56..])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_deterministic() {
        let msg = json!({"type": "Ping", "data": {"seq": 1}});
        assert_eq!(ContentHash::of_json(&msg), ContentHash::of_json(&msg));
    }

    #[test]
    fn test_hash_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"type":"Ping","data":{"a":1,"b":2}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"data":{"b":2,"a":1},"type":"Ping"}"#).unwrap();
        assert_eq!(ContentHash::of_json(&a), ContentHash::of_json(&b));
    }

    #[test]
    fn test_hash_distinguishes_content() {
        let ping = json!({"type": "Ping", "data": {}});
        let pong = json!({"type": "Pong", "data": {}});
        assert_ne!(ContentHash::of_json(&ping), ContentHash::of_json(&pong));
    }

    #[test]
    fn test_json_hash_matches_encoded_bytes() {
        let msg = json!({"type": "Ping", "data": {}});
        let encoded = serde_json::to_vec(&msg).unwrap();
        assert_eq!(ContentHash::of_json(&msg), ContentHash::from_bytes(&encoded));
    }

    #[test]
    fn test_hex_forms() {
        let hash = ContentHash::from_bytes(b"test data");
        let hex = hash.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(hash.short(), hex[..8]);
        assert_eq!(hash.to_string(), hex);
        assert_eq!(
            format!("{:?}", hash),
            format!("ContentHash({}..{})", &hex[..8], &hex[56..])
        );
    }
}
