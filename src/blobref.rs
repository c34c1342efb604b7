//! Blob references: hash-addressed names for immutable blobs.
//!
//! A blob ref looks like `sha1-0bfe45...`: a hash function name, a dash,
//! and the lowercase hex digest. The store addresses everything by these,
//! including the permanodes this UI searches and groups.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Pattern a ref must match before we send it anywhere near the store.
fn ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\w+-[a-f0-9]+$").expect("valid blob ref pattern"))
}

/// Check whether a string is plausibly a blob ref.
///
/// This is a format check only; it says nothing about whether the blob
/// exists on the store.
pub fn is_plausible(s: &str) -> bool {
    ref_pattern().is_match(s)
}

/// A validated blob reference. The only ways to construct one are
/// [`BlobRef::parse`] and deserialization, both of which apply the format
/// check, so the digest is always ASCII hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BlobRef(String);

impl<'de> Deserialize<'de> for BlobRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BlobRef::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("implausible blob ref: {s:?}")))
    }
}

impl BlobRef {
    /// Parse a blob ref, rejecting anything that fails the format check.
    pub fn parse(s: &str) -> Option<Self> {
        if is_plausible(s) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for link labels when no title is known.
    pub fn short(&self) -> String {
        match self.0.split_once('-') {
            Some((hash, digest)) if digest.len() > 10 => {
                format!("{}-{}…", hash, &digest[..10])
            }
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
