//! Public verification document types

use serde::{Deserialize, Serialize};

/// One public key as published in the JWKS document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationEntry {
    pub kid: String,
    pub alg: String,
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: String,
    /// Base64url (unpadded) big-endian modulus
    pub n: String,
    /// Base64url (unpadded) big-endian public exponent
    pub e: String,
}

impl VerificationEntry {
    /// RS256 signature key entry
    pub fn rs256(kid: impl Into<String>, n: impl Into<String>, e: impl Into<String>) -> Self {
        Self {
            kid: kid.into(),
            alg: "RS256".to_string(),
            kty: "RSA".to_string(),
            key_use: "sig".to_string(),
            n: n.into(),
            e: e.into(),
        }
    }
}

/// `{"keys": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationDocument {
    pub keys: Vec<VerificationEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_use_field() {
        let entry = VerificationEntry::rs256("1", "AQAB-n", "AQAB");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["use"], "sig");
        assert_eq!(json["alg"], "RS256");
        assert_eq!(json["kty"], "RSA");
        assert_eq!(json["kid"], "1");
        assert!(json.get("key_use").is_none());
    }

    #[test]
    fn test_empty_document() {
        let json = serde_json::to_string(&VerificationDocument::default()).unwrap();
        assert_eq!(json, r#"{"keys":[]}"#);
    }
}
