//! Content identifiers and their on-chain multihash representation.
//!
//! A content identifier (CID) is the base58 encoding of a multihash:
//!
//! ```text
//! [hash function code: 1 byte][digest length: 1 byte][digest bytes]
//! ```
//!
//! The hotel contract stores the three fields separately, so this crate
//! converts between the base58 text and [`MultihashParts`] in both
//! directions.
//!
//! # Limitations
//!
//! [`encode_from_hex`] only accepts sha2-256 multihashes (prefix `1220`).
//! It is not a general multihash encoder. [`decode_to_parts`] accepts any
//! function code as long as the length byte matches the digest, and leaves
//! the question of whether the algorithm is supported to the caller.

use std::{fmt, str::FromStr};

use data_encoding::{HEXLOWER, HEXLOWER_PERMISSIVE};
use serde::{Deserialize, Serialize};

/// Multihash code of sha2-256.
pub const SHA2_256: u8 = 0x12;

/// Digest length of sha2-256 in bytes.
pub const SHA2_256_LEN: u8 = 0x20;

/// The only hex prefix [`encode_from_hex`] accepts.
pub const SHA2_256_PREFIX: &str = "1220";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidError {
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("unsupported multihash prefix {0:?}, only {SHA2_256_PREFIX:?} (sha2-256) is accepted")]
    UnsupportedMultihashPrefix(String),
}

/// A base58 content identifier.
///
/// Construction validates that the text decodes to a well-formed multihash,
/// so every value of this type satisfies the layout invariant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentIdentifier(String);

impl ContentIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into the three on-chain fields.
    pub fn to_parts(&self) -> Result<MultihashParts, CidError> {
        decode_to_parts(&self.0)
    }

    /// The full multihash as `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> Result<String, CidError> {
        cid_to_hex(&self.0)
    }
}

impl FromStr for ContentIdentifier {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_to_parts(s)?;
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for ContentIdentifier {
    type Error = CidError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        decode_to_parts(&s)?;
        Ok(Self(s))
    }
}

impl From<ContentIdentifier> for String {
    fn from(c: ContentIdentifier) -> Self {
        c.0
    }
}

impl AsRef<str> for ContentIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three-field record a contract stores for a content identifier.
///
/// Invariant: `size` equals the byte length of `digest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultihashParts {
    function: u8,
    size: u8,
    digest: Vec<u8>,
}

impl MultihashParts {
    pub fn new(function: u8, size: u8, digest: Vec<u8>) -> Result<Self, CidError> {
        if usize::from(size) != digest.len() {
            return Err(CidError::MalformedIdentifier(format!(
                "hash size {size} does not match digest length {}",
                digest.len()
            )));
        }
        Ok(Self {
            function,
            size,
            digest,
        })
    }

    /// A sha2-256 multihash of the given digest.
    pub fn sha2_256(digest: [u8; 32]) -> Self {
        Self {
            function: SHA2_256,
            size: SHA2_256_LEN,
            digest: digest.to_vec(),
        }
    }

    pub fn hash_function(&self) -> u8 {
        self.function
    }

    pub fn hash_size(&self) -> u8 {
        self.size
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    pub fn hash_function_hex(&self) -> String {
        format!("0x{:02x}", self.function)
    }

    pub fn hash_size_hex(&self) -> String {
        format!("0x{:02x}", self.size)
    }

    pub fn digest_hex(&self) -> String {
        format!("0x{}", HEXLOWER.encode(&self.digest))
    }

    /// `function ++ size ++ digest`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(2 + self.digest.len());
        v.push(self.function);
        v.push(self.size);
        v.extend_from_slice(&self.digest);
        v
    }

    /// Base58-encode the reassembled multihash.
    pub fn to_cid(&self) -> ContentIdentifier {
        ContentIdentifier(bs58::encode(self.to_bytes()).into_string())
    }
}

impl fmt::Display for MultihashParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "function={} size={} digest={}",
            self.hash_function_hex(),
            self.hash_size_hex(),
            self.digest_hex()
        )
    }
}

/// Decode a base58 identifier and slice it into its multihash fields.
pub fn decode_to_parts(cid: &str) -> Result<MultihashParts, CidError> {
    let bytes = decode_base58(cid)?;
    let [function, size, digest @ ..] = bytes.as_slice() else {
        return Err(CidError::MalformedIdentifier(format!(
            "{} byte(s) decoded, at least 2 required",
            bytes.len()
        )));
    };
    MultihashParts::new(*function, *size, digest.to_vec())
}

/// Build an identifier from a hex multihash starting with `1220`.
///
/// An optional `0x` prefix is tolerated. The digest must be exactly 32
/// bytes of valid hex; nothing is padded or truncated.
pub fn encode_from_hex(hex: &str) -> Result<ContentIdentifier, CidError> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    let Some(rest) = hex.strip_prefix(SHA2_256_PREFIX) else {
        let prefix = hex.get(..SHA2_256_PREFIX.len()).unwrap_or(hex);
        return Err(CidError::UnsupportedMultihashPrefix(prefix.to_string()));
    };
    let digest = HEXLOWER_PERMISSIVE
        .decode(rest.as_bytes())
        .map_err(|e| CidError::MalformedIdentifier(format!("invalid hex digest: {e}")))?;
    let parts = MultihashParts::new(SHA2_256, SHA2_256_LEN, digest)?;
    Ok(parts.to_cid())
}

/// The full multihash of an identifier as `0x`-prefixed hex.
pub fn cid_to_hex(cid: &str) -> Result<String, CidError> {
    decode_base58(cid).map(|b| format!("0x{}", HEXLOWER.encode(&b)))
}

fn decode_base58(cid: &str) -> Result<Vec<u8>, CidError> {
    bs58::decode(cid)
        .into_vec()
        .map_err(|e| CidError::MalformedIdentifier(format!("invalid base58: {e}")))
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    const DIGEST_0_TO_31_CID: &str = "QmNLfbof5rLekrACjeuLk9JmGZD2HDBHCU4z16iYKmx5SE";

    fn digest_from(v: &[u8]) -> [u8; 32] {
        let mut d = [0u8; 32];
        for (x, y) in d.iter_mut().zip(v) {
            *x = *y
        }
        d
    }

    quickcheck! {
        fn hex_to_parts(v: Vec<u8>) -> bool {
            let d = digest_from(&v);
            let hex = format!("1220{}", HEXLOWER.encode(&d));
            let parts = encode_from_hex(&hex).unwrap().to_parts().unwrap();
            parts.hash_function_hex() == "0x12"
                && parts.hash_size_hex() == "0x20"
                && parts.digest_hex() == format!("0x{}", HEXLOWER.encode(&d))
        }

        fn parts_to_cid(v: Vec<u8>) -> bool {
            let d = digest_from(&v);
            let cid = encode_from_hex(&format!("1220{}", HEXLOWER.encode(&d))).unwrap();
            let parts = decode_to_parts(cid.as_str()).unwrap();
            parts.to_cid() == cid
                && bs58::encode(parts.to_bytes()).into_string() == cid.as_str()
        }

        fn foreign_prefix_rejected(p: u16, v: Vec<u8>) -> bool {
            let prefix = format!("{p:04x}");
            if prefix == SHA2_256_PREFIX {
                return true
            }
            let hex = format!("{prefix}{}", HEXLOWER.encode(&digest_from(&v)));
            encode_from_hex(&hex) == Err(CidError::UnsupportedMultihashPrefix(prefix))
        }
    }

    #[test]
    fn known_identifier() {
        let parts = decode_to_parts("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG").unwrap();
        assert_eq!(parts.hash_function(), SHA2_256);
        assert_eq!(parts.hash_size(), SHA2_256_LEN);
        assert_eq!(
            parts.digest_hex(),
            "0x9d6c2be50f706953479ab9df2ce3edca90b68053c00b3004b7f0accbe1e8eedf"
        );

        let digest: Vec<u8> = (0..32).collect();
        let hex = format!("1220{}", HEXLOWER.encode(&digest));
        assert_eq!(encode_from_hex(&hex).unwrap().as_str(), DIGEST_0_TO_31_CID);
        assert_eq!(cid_to_hex(DIGEST_0_TO_31_CID).unwrap(), format!("0x{hex}"));
        let cid: ContentIdentifier = DIGEST_0_TO_31_CID.parse().unwrap();
        assert_eq!(cid.to_hex().unwrap(), format!("0x{hex}"));
    }

    #[test]
    fn aabb_prefix() {
        let hex = format!("aabb{}", "00".repeat(32));
        assert_eq!(
            encode_from_hex(&hex),
            Err(CidError::UnsupportedMultihashPrefix("aabb".into()))
        );
        assert!(matches!(
            encode_from_hex("12"),
            Err(CidError::UnsupportedMultihashPrefix(_))
        ));
    }

    #[test]
    fn short_digest_is_not_padded() {
        assert!(matches!(
            encode_from_hex("1220deadbeef"),
            Err(CidError::MalformedIdentifier(_))
        ));
        // odd number of hex digits
        let hex = format!("1220{}0", "ab".repeat(32));
        assert!(matches!(
            encode_from_hex(&hex),
            Err(CidError::MalformedIdentifier(_))
        ));
        let hex = format!("1220{}", "zz".repeat(32));
        assert!(matches!(
            encode_from_hex(&hex),
            Err(CidError::MalformedIdentifier(_))
        ));
    }

    #[test]
    fn optional_0x_prefix() {
        let hex = format!("0x1220{}", "00".repeat(32));
        assert!(encode_from_hex(&hex).is_ok());
    }

    #[test]
    fn malformed_identifiers() {
        // decodes to a single byte
        assert!(matches!(
            decode_to_parts("K"),
            Err(CidError::MalformedIdentifier(_))
        ));
        assert!(matches!(
            decode_to_parts(""),
            Err(CidError::MalformedIdentifier(_))
        ));
        // size byte says 32, only 4 digest bytes follow
        assert!(matches!(
            decode_to_parts("A2ZtRdqB"),
            Err(CidError::MalformedIdentifier(_))
        ));
        // `0` is not in the base58 alphabet
        assert!(matches!(
            decode_to_parts("Qm0"),
            Err(CidError::MalformedIdentifier(_))
        ));
        assert!("A2ZtRdqB".parse::<ContentIdentifier>().is_err());
    }

    #[test]
    fn other_algorithms_decode_when_consistent() {
        let p = decode_to_parts("9yRzenUe").unwrap();
        assert_eq!(p.hash_function(), SHA2_256);
        assert_eq!(p.hash_size(), 4);
        assert_eq!(p.digest_hex(), "0xdeadbeef");

        let p = decode_to_parts("cZoLRXR741XPhNLCv4Hdm93KJCxruqamrJNKkKntC9ngXp").unwrap();
        assert_eq!(p.hash_function_hex(), "0x1b");
        assert_eq!(p.digest(), (0..32).collect::<Vec<u8>>().as_slice());
    }

    #[test]
    fn serde_validates() {
        let c: ContentIdentifier =
            serde_json::from_str(&format!("\"{DIGEST_0_TO_31_CID}\"")).unwrap();
        assert_eq!(c.as_str(), DIGEST_0_TO_31_CID);
        assert!(serde_json::from_str::<ContentIdentifier>("\"K\"").is_err());
    }
}
