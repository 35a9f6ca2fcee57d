//! Binary-to-text compression codec: base64(gzip(bytes)).
//!
//! The gzip container (not raw deflate) is deliberate — it carries a CRC,
//! so a corrupted or truncated stream is a hard decode failure instead of
//! silently shorter output.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{BlockKind, Result, SealError};
use crate::model::CompressedBlob;

/// Default compression level (flate2's "6" balance point).
pub const DEFAULT_LEVEL: u32 = 6;

/// Compress `data` and encode the result as base64 text.
///
/// No size limit is enforced here; callers own the overall
/// message-size constraint.
pub fn compress(data: &[u8], level: u32) -> String {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    // The sink is a Vec; these writes cannot fail.
    encoder.write_all(data).expect("write to Vec");
    let compressed = encoder.finish().expect("finish gzip to Vec");
    BASE64.encode(compressed)
}

/// Compress `data` into a [`CompressedBlob`], logging the stats the way
/// the sender side always has.
pub fn compress_blob(data: &[u8], level: u32) -> CompressedBlob {
    let blob = CompressedBlob {
        compressed_data: compress(data, level),
        original_size: data.len() as u64,
    };
    tracing::debug!(
        original_size = blob.original_size,
        compressed_size = blob.compressed_len(),
        ratio = format!("{:.2}%", blob.compression_ratio()),
        "compressed blob"
    );
    blob
}

/// Reverse [`compress`]: base64-decode, then inflate.
///
/// Fails with [`SealError::Decode`] on invalid base64 and
/// [`SealError::Inflate`] on a corrupt compressed stream. The gzip CRC
/// check means truncation is always a hard error — this never returns a
/// shorter-than-expected buffer.
pub fn decompress(text: &str, block: BlockKind) -> Result<Vec<u8>> {
    let compressed = BASE64
        .decode(text)
        .map_err(|source| SealError::Decode { block, source })?;

    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|source| SealError::Inflate { block, source })?;
    Ok(out)
}

/// Decompress a blob and verify it yields exactly the declared size.
///
/// `name` identifies the blob in the error (attachment file name, or a
/// fixed label for audio).
pub fn decompress_blob(blob: &CompressedBlob, block: BlockKind, name: &str) -> Result<Vec<u8>> {
    let data = decompress(&blob.compressed_data, block)?;
    if data.len() as u64 != blob.original_size {
        return Err(SealError::SizeMismatch {
            name: name.to_string(),
            expected: blob.original_size,
            actual: data.len() as u64,
        });
    }
    Ok(data)
}
