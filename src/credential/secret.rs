//! The shared secret and its two on-disk encodings.
//!
//! Older configuration directories store the secret as plaintext; that is
//! still accepted so existing setups keep working, but anything written by
//! this version is a salted SHA-256 digest:
//!
//! ```text
//! sha256$<salt>$<hex digest of salt || secret>
//! ```

use sha2::{Digest, Sha256};
use uuid::Uuid;

const HASH_PREFIX: &str = "sha256";

/// A stored secret that candidate credentials are compared against.
#[derive(Clone, PartialEq, Eq)]
pub enum Secret {
    /// Legacy plaintext secret.
    Plain(String),
    /// Salted SHA-256 digest.
    Hashed { salt: String, digest: String },
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Secret::Plain(_) => f.write_str("Secret::Plain(<redacted>)"),
            Secret::Hashed { salt, .. } => write!(f, "Secret::Hashed {{ salt: {} }}", salt),
        }
    }
}

impl Secret {
    /// Parse the stored form. Surrounding whitespace is ignored; an empty
    /// file means no secret is set.
    pub fn parse(stored: &str) -> Option<Self> {
        let stored = stored.trim();
        if stored.is_empty() {
            return None;
        }
        let mut parts = stored.splitn(3, '$');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(HASH_PREFIX), Some(salt), Some(digest))
                if !salt.is_empty() && digest.len() == 64 =>
            {
                Some(Secret::Hashed {
                    salt: salt.to_string(),
                    digest: digest.to_lowercase(),
                })
            }
            _ => Some(Secret::Plain(stored.to_string())),
        }
    }

    /// Hash `secret` with a fresh random salt.
    pub fn hashed(secret: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = digest(&salt, secret);
        Secret::Hashed { salt, digest }
    }

    /// True if `candidate` matches this secret.
    pub fn verify(&self, candidate: &str) -> bool {
        match self {
            Secret::Plain(expected) => constant_time_eq(expected.as_bytes(), candidate.as_bytes()),
            Secret::Hashed { salt, digest: expected } => {
                let actual = digest(salt, candidate);
                constant_time_eq(expected.as_bytes(), actual.as_bytes())
            }
        }
    }

    /// True for the legacy plaintext form.
    pub fn is_plaintext(&self) -> bool {
        matches!(self, Secret::Plain(_))
    }

    /// Encode for storage.
    pub fn encode(&self) -> String {
        match self {
            Secret::Plain(value) => value.clone(),
            Secret::Hashed { salt, digest } => format!("{}${}${}", HASH_PREFIX, salt, digest),
        }
    }
}

fn digest(salt: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
