//! The marker-delimited envelope carried inside an email body.

use std::collections::BTreeMap;

/// Envelope metadata: string keys to string values (encryption-scheme
/// name, timestamp, scheme-specific parameters).
///
/// A `BTreeMap` keeps serialization deterministic so
/// `extract(build(m, p))` returns the same map it was given.
pub type Metadata = BTreeMap<String, String>;

/// An extracted envelope: metadata plus the opaque encrypted payload.
///
/// The payload is the ciphertext produced by an external encryption
/// service, already text-safe. This crate never interprets it — it only
/// carries it through the email body intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub metadata: Metadata,
    pub payload: String,
}

impl Envelope {
    pub fn new(metadata: Metadata, payload: impl Into<String>) -> Self {
        Self {
            metadata,
            payload: payload.into(),
        }
    }

    /// The encryption scheme named in the metadata, if any.
    ///
    /// Every scheme version in the wild writes an `Encryption` key;
    /// absence just means an older or foreign producer.
    pub fn scheme(&self) -> Option<&str> {
        self.metadata.get("Encryption").map(String::as_str)
    }
}
