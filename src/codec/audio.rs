//! Audio block codec: the `AUDIO_COMPRESSED:` block.
//!
//! One compressed recording per message, serialized as
//! `AUDIO_COMPRESSED:<mime-type>:<base64 data>` on a single logical line.

use crate::codec::compress;
use crate::error::{BlockKind, Result, SealError};
use crate::model::{AudioBlock, CompressedBlob, DecodedAudio};

/// Line prefix announcing an audio block.
pub const MARKER: &str = "AUDIO_COMPRESSED:";

/// Serialize a recording into a single `AUDIO_COMPRESSED:` line.
///
/// The MIME type is transmitted verbatim — the receiver must honor the
/// container the sender's recorder chose, not a default.
pub fn serialize(mime_type: &str, blob: &CompressedBlob) -> String {
    format!("{MARKER}{mime_type}:{}", blob.compressed_data)
}

/// Locate and parse the audio block inside `text`.
///
/// The remainder after the marker is split at the *first* colon: MIME
/// types never contain a colon, base64 data never starts one, so the
/// split is deterministic. No marker means no recording (`Ok(None)`);
/// a marker with no colon after it is [`SealError::AudioHeader`].
///
/// The payload is decompressed as part of parsing, so corrupt data
/// surfaces here as a typed decode/inflate error rather than later
/// during playback.
pub fn parse(text: &str) -> Result<Option<AudioBlock>> {
    let Some(start) = text.find(MARKER) else {
        return Ok(None);
    };
    let rest = &text[start + MARKER.len()..];
    let line = rest.lines().next().unwrap_or("").trim();

    let Some((mime_type, data)) = line.split_once(':') else {
        return Err(SealError::AudioHeader(format!(
            "no ':' separator after marker (got {:?})",
            truncate_for_log(line)
        )));
    };

    // Validate the stream now and learn the original size from it.
    let decoded = compress::decompress(data, BlockKind::Audio)?;

    Ok(Some(AudioBlock {
        mime_type: mime_type.to_string(),
        blob: CompressedBlob {
            compressed_data: data.to_string(),
            original_size: decoded.len() as u64,
        },
    }))
}

/// Locate, parse, and fully reconstruct the recording in one step.
pub fn decode(text: &str) -> Result<Option<DecodedAudio>> {
    let Some(block) = parse(text)? else {
        return Ok(None);
    };
    let data = compress::decompress_blob(&block.blob, BlockKind::Audio, "audio")?;
    tracing::debug!(
        mime_type = %block.mime_type,
        size = data.len(),
        "decoded audio block"
    );
    Ok(Some(DecodedAudio {
        mime_type: block.mime_type,
        data,
    }))
}

/// Strip an audio block line out of `text`, leaving the surrounding
/// message.
pub fn strip(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with(MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_for_log(s: &str) -> String {
    const MAX: usize = 40;
    // Received text is untrusted and may be non-ASCII; cut on a char
    // boundary, never a byte index.
    match s.char_indices().nth(MAX) {
        Some((byte_idx, _)) => format!("{}...", &s[..byte_idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compress::{compress_blob, DEFAULT_LEVEL};

    #[test]
    fn test_round_trip_mime_and_payload() {
        let payload = vec![7u8; 1000];
        let blob = compress_blob(&payload, DEFAULT_LEVEL);
        let text = serialize("audio/webm", &blob);

        let block = parse(&text).unwrap().unwrap();
        assert_eq!(block.mime_type, "audio/webm");
        assert_eq!(block.blob.original_size, 1000);

        let decoded = decode(&text).unwrap().unwrap();
        assert_eq!(decoded.mime_type, "audio/webm");
        assert_eq!(decoded.data, payload);
    }

    #[test]
    fn test_mime_with_parameters_round_trips() {
        // Realistic recorder output: parameters after a semicolon.
        let blob = compress_blob(b"opus frames", DEFAULT_LEVEL);
        let mime = "audio/webm;codecs=opus";
        let block = parse(&serialize(mime, &blob)).unwrap().unwrap();
        assert_eq!(block.mime_type, mime);
    }

    #[test]
    fn test_absent_marker_is_none() {
        assert!(parse("a plain message with no recording").unwrap().is_none());
        assert!(decode("").unwrap().is_none());
    }

    #[test]
    fn test_missing_colon_is_header_error() {
        let err = parse("AUDIO_COMPRESSED:justonechunk").unwrap_err();
        assert!(matches!(err, SealError::AudioHeader(_)));
    }

    #[test]
    fn test_non_ascii_header_without_colon_is_header_error() {
        // Colon-free multibyte garbage after the marker must surface as
        // a typed error, not abort the scan.
        for count in [20usize, 60] {
            let line = format!("{MARKER}{}", "\u{2713}".repeat(count));
            let err = parse(&line).unwrap_err();
            match err {
                SealError::AudioHeader(reason) => assert!(reason.contains('\u{2713}')),
                other => panic!("expected AudioHeader error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_corrupt_data_is_typed_error() {
        let err = parse("AUDIO_COMPRESSED:audio/webm:!!notbase64!!").unwrap_err();
        assert!(matches!(
            err,
            SealError::Decode {
                block: BlockKind::Audio,
                ..
            }
        ));
    }

    #[test]
    fn test_marker_found_inside_surrounding_text() {
        let blob = compress_blob(b"voice", DEFAULT_LEVEL);
        let body = format!(
            "Hi, I recorded a note for you.\n\n{}\n\nCheers",
            serialize("audio/mp4", &blob)
        );
        let decoded = decode(&body).unwrap().unwrap();
        assert_eq!(decoded.mime_type, "audio/mp4");
        assert_eq!(decoded.data, b"voice");
    }

    #[test]
    fn test_strip_removes_audio_line() {
        let blob = compress_blob(b"x", DEFAULT_LEVEL);
        let body = format!("before\n{}\nafter", serialize("audio/webm", &blob));
        assert_eq!(strip(&body), "before\nafter");
    }
}
