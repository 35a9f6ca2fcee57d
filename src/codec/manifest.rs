//! Attachment manifest codec: the `FILES_COMPRESSED:` block.
//!
//! The manifest is a single logical line — the marker followed by a JSON
//! array of attachment records. Record order is significant: it is the
//! only association the receiver has between reconstructed blobs and any
//! external ordering expectation.

use crate::codec::compress;
use crate::error::{BlockKind, Result, SealError};
use crate::model::{AttachmentRecord, DecodedAttachment};

/// Line prefix announcing an attachment manifest.
pub const MARKER: &str = "FILES_COMPRESSED:";

/// Build an [`AttachmentRecord`] from a file's raw bytes.
pub fn record_from_bytes(
    name: &str,
    mime_type: &str,
    data: &[u8],
    level: u32,
) -> AttachmentRecord {
    let compressed = compress::compress_blob(data, level);
    let ratio = compressed.compression_ratio();
    tracing::debug!(
        name,
        mime_type,
        size = data.len(),
        ratio = format!("{ratio:.2}%"),
        "compressed attachment"
    );
    AttachmentRecord {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        size: data.len() as u64,
        compressed,
        compression_ratio: ratio,
    }
}

/// Serialize records into a single `FILES_COMPRESSED:` line.
pub fn serialize(records: &[AttachmentRecord]) -> Result<String> {
    let json = serde_json::to_string(records).map_err(|e| SealError::ManifestParse {
        reason: format!("serialize: {e}"),
    })?;
    Ok(format!("{MARKER}{json}"))
}

/// Locate and parse the manifest inside `text`.
///
/// Absence of the marker is a valid state (no attachments), not malformed
/// input — it returns an empty list. A marker whose JSON does not decode
/// to the expected shape is [`SealError::ManifestParse`].
pub fn parse(text: &str) -> Result<Vec<AttachmentRecord>> {
    let Some(start) = text.find(MARKER) else {
        return Ok(Vec::new());
    };
    let rest = &text[start + MARKER.len()..];
    // The manifest extends to the end of its logical line.
    let json = rest.lines().next().unwrap_or("").trim();

    serde_json::from_str(json).map_err(|e| SealError::ManifestParse {
        reason: e.to_string(),
    })
}

/// Reconstruct every attachment in the manifest.
///
/// A manifest is sent as one atomic unit, so the policy is fail-fast: the
/// first record that does not decode aborts the batch, with the record's
/// index and declared name in the error.
pub fn decode_all(records: &[AttachmentRecord]) -> Result<Vec<DecodedAttachment>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            decode_record(record).map_err(|source| SealError::Attachment {
                index,
                name: record.name.clone(),
                source: Box::new(source),
            })
        })
        .collect()
}

/// Reconstruct a single attachment: decompress and pair with the declared
/// name and MIME type.
pub fn decode_record(record: &AttachmentRecord) -> Result<DecodedAttachment> {
    let data = compress::decompress_blob(&record.compressed, BlockKind::File, &record.name)?;
    Ok(DecodedAttachment {
        name: record.name.clone(),
        mime_type: record.mime_type.clone(),
        data,
    })
}

/// Strip a manifest line out of `text`, leaving the surrounding message.
pub fn strip(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with(MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}
