//! Text-safe representation of compressed binary data.

use serde::{Deserialize, Serialize};

/// Base64-encoded, deflate-compressed binary data.
///
/// This is the unit everything else transports: attachments and audio
/// recordings become a `CompressedBlob` before being embedded in an email
/// body. Decompressing `compressed_data` must yield exactly
/// `original_size` bytes — a shorter result is reported as an error by the
/// codec, never returned silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressedBlob {
    /// base64(gzip(bytes)) — safe for plain-text email transport.
    pub compressed_data: String,

    /// Byte length of the data before compression.
    pub original_size: u64,
}

impl CompressedBlob {
    /// Length in bytes of the compressed stream (before base64 expansion).
    ///
    /// base64 encodes 3 bytes per 4 characters; padding makes this an
    /// estimate accurate to within 2 bytes, which is all the telemetry
    /// ratio needs.
    pub fn compressed_len(&self) -> u64 {
        let chars = self.compressed_data.len() as u64;
        let padding = self
            .compressed_data
            .bytes()
            .rev()
            .take_while(|&b| b == b'=')
            .count() as u64;
        (chars / 4) * 3 - padding
    }

    /// Compression ratio as a percentage: `(original - compressed) /
    /// original * 100`. Informational only — never used to validate
    /// correctness. Zero for empty input.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        let original = self.original_size as f64;
        let compressed = self.compressed_len() as f64;
        (original - compressed) / original * 100.0
    }
}
