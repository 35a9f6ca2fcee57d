//! File attachment records carried in a manifest.

use serde::{Deserialize, Serialize};

use super::blob::CompressedBlob;

/// One entry in a `FILES_COMPRESSED:` manifest.
///
/// Created at send time from a binary source, consumed at receive time to
/// reconstruct a named, typed binary object. Never mutated after creation.
/// The wire format is a flat JSON object with the field names the original
/// protocol shipped (`name`, `type`, `size`, `compressedData`,
/// `originalSize`, `compressionRatio`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRecord {
    /// Declared file name. Display only — never trusted for path
    /// construction without sanitizing.
    pub name: String,

    /// Declared MIME content type (e.g. `"image/png"`).
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Declared original size in bytes.
    pub size: u64,

    /// The compressed payload. Flattened on the wire: `compressedData`
    /// and `originalSize` sit at the top level of the record object.
    #[serde(flatten)]
    pub compressed: CompressedBlob,

    /// `(size - compressedLength) / size * 100`, two-decimal telemetry.
    /// Informational only, never used to validate correctness.
    pub compression_ratio: f64,
}

/// A reconstructed attachment: decompressed bytes paired with the name
/// and MIME type declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAttachment {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}
