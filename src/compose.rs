//! Send-path assembly and receive-path scanning.
//!
//! Sending: plaintext body + optional recording + optional files become a
//! single text blob with `AUDIO_COMPRESSED:` / `FILES_COMPRESSED:` lines
//! appended. That blob goes to the external encryption service, and the
//! resulting ciphertext is wrapped in an envelope with [`seal_body`].
//!
//! Receiving: decrypted text is scanned for the block markers; audio and
//! attachments are reconstructed, the marker lines are stripped, and the
//! remaining text is the message. A broken block never takes the message
//! text down with it.

use chrono::Utc;

use crate::codec::{audio, compress, envelope, manifest};
use crate::error::{Result, SealError};
use crate::model::{DecodedAttachment, DecodedAudio, Metadata};

/// A file handed to the send path.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// The receive-path result: the message text with block markers removed,
/// plus whatever binary content could be reconstructed.
///
/// `failures` holds per-block errors (bad manifest JSON, corrupt audio
/// stream, ...) that were logged and skipped — the text is always
/// present.
#[derive(Debug)]
pub struct DecodedMessage {
    pub text: String,
    pub audio: Option<DecodedAudio>,
    pub attachments: Vec<DecodedAttachment>,
    pub failures: Vec<SealError>,
}

/// Assemble the plaintext to be encrypted: the body followed by the
/// serialized audio and manifest blocks.
pub fn pack_plaintext(
    body: &str,
    recording: Option<(&str, &[u8])>,
    files: &[FileInput],
    level: u32,
) -> Result<String> {
    let mut out = body.to_string();

    if let Some((mime_type, data)) = recording {
        let blob = compress::compress_blob(data, level);
        out.push_str("\n\n");
        out.push_str(&audio::serialize(mime_type, &blob));
    }

    if !files.is_empty() {
        let records: Vec<_> = files
            .iter()
            .map(|f| manifest::record_from_bytes(&f.name, &f.mime_type, &f.data, level))
            .collect();
        out.push_str("\n\n");
        out.push_str(&manifest::serialize(&records)?);
    }

    Ok(out)
}

/// Scan decrypted text and reconstruct its binary content.
///
/// Block failures are recoverable per-attachment: they are logged,
/// collected into `failures`, and the primary message text is extracted
/// regardless.
pub fn unpack_plaintext(text: &str) -> DecodedMessage {
    let mut failures = Vec::new();

    let recording = match audio::decode(text) {
        Ok(recording) => recording,
        Err(e) => {
            tracing::warn!(error = %e, "audio block failed to decode");
            failures.push(e);
            None
        }
    };

    let attachments = match manifest::parse(text).and_then(|r| manifest::decode_all(&r)) {
        Ok(attachments) => attachments,
        Err(e) => {
            tracing::warn!(error = %e, "attachment manifest failed to decode");
            failures.push(e);
            Vec::new()
        }
    };

    let text = manifest::strip(&audio::strip(text)).trim_end().to_string();

    DecodedMessage {
        text,
        audio: recording,
        attachments,
        failures,
    }
}

/// Wrap externally produced ciphertext in a full email body: scheme
/// banner, envelope blocks, and a `Timestamp` stamped into the metadata
/// if the caller did not set one.
pub fn seal_body(
    scheme_banner: Option<&str>,
    mut metadata: Metadata,
    payload: &str,
    wrap_width: usize,
) -> String {
    metadata
        .entry("Timestamp".to_string())
        .or_insert_with(|| Utc::now().to_rfc3339());

    let envelope_text = envelope::build(&metadata, payload, wrap_width);
    match scheme_banner {
        Some(scheme) => format!("[{scheme} ENCRYPTED]\n\n{envelope_text}"),
        None => envelope_text,
    }
}

/// Decorate a subject line the way every scheme version does: lock
/// prefix, bracketed tag suffix.
pub fn seal_subject(subject: &str, tag: &str) -> String {
    format!("\u{1F510} {subject} [{tag}]")
}

/// Undo [`seal_subject`] for display: strip the lock prefix and any
/// trailing `[... Encrypted]` tag.
pub fn display_subject(subject: &str) -> String {
    let mut s = subject.trim().to_string();
    if let Some(rest) = s.strip_prefix('\u{1F510}') {
        s = rest.trim_start().to_string();
    }
    // Trailing bracketed tag ending in "Encrypted]"
    if s.ends_with("Encrypted]") {
        if let Some(open) = s.rfind('[') {
            s.truncate(open);
            s = s.trim_end().to_string();
        }
    }
    if s.is_empty() {
        "(No subject)".to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::compress::DEFAULT_LEVEL;

    fn sample_files() -> Vec<FileInput> {
        vec![
            FileInput {
                name: "a.png".into(),
                mime_type: "image/png".into(),
                data: vec![0x89, 0x50, 0x4E, 0x47],
            },
            FileInput {
                name: "b.pdf".into(),
                mime_type: "application/pdf".into(),
                data: b"%PDF-1.4".to_vec(),
            },
        ]
    }

    #[test]
    fn test_pack_unpack_round_trip() {
        let packed = pack_plaintext(
            "hello with everything",
            Some(("audio/webm", b"voice data".as_slice())),
            &sample_files(),
            DEFAULT_LEVEL,
        )
        .unwrap();

        let decoded = unpack_plaintext(&packed);
        assert_eq!(decoded.text, "hello with everything");
        assert!(decoded.failures.is_empty());

        let recording = decoded.audio.unwrap();
        assert_eq!(recording.mime_type, "audio/webm");
        assert_eq!(recording.data, b"voice data");

        assert_eq!(decoded.attachments.len(), 2);
        assert_eq!(decoded.attachments[0].name, "a.png");
        assert_eq!(decoded.attachments[1].data, b"%PDF-1.4");
    }

    #[test]
    fn test_body_only_passes_through() {
        let packed = pack_plaintext("just text", None, &[], DEFAULT_LEVEL).unwrap();
        assert_eq!(packed, "just text");
        let decoded = unpack_plaintext(&packed);
        assert_eq!(decoded.text, "just text");
        assert!(decoded.audio.is_none());
        assert!(decoded.attachments.is_empty());
    }

    #[test]
    fn test_broken_manifest_keeps_text_and_audio() {
        let mut packed = pack_plaintext(
            "message",
            Some(("audio/mp4", b"hum".as_slice())),
            &[],
            DEFAULT_LEVEL,
        )
        .unwrap();
        packed.push_str("\n\nFILES_COMPRESSED:{broken json");

        let decoded = unpack_plaintext(&packed);
        assert_eq!(decoded.text, "message");
        assert!(decoded.audio.is_some());
        assert!(decoded.attachments.is_empty());
        assert_eq!(decoded.failures.len(), 1);
        assert!(decoded.failures[0].is_block_local());
    }

    #[test]
    fn test_seal_body_stamps_timestamp() {
        let body = seal_body(Some("QKD"), Metadata::new(), "Y2lwaGVy", 0);
        assert!(body.starts_with("[QKD ENCRYPTED]\n\n"));
        let envelope = crate::codec::envelope::extract(&body).unwrap();
        assert!(envelope.metadata.contains_key("Timestamp"));
        assert_eq!(envelope.payload, "Y2lwaGVy");
    }

    #[test]
    fn test_seal_body_keeps_caller_timestamp() {
        let mut m = Metadata::new();
        m.insert("Timestamp".into(), "2026-01-01T00:00:00Z".into());
        let body = seal_body(None, m, "cGF5", 0);
        let envelope = crate::codec::envelope::extract(&body).unwrap();
        assert_eq!(
            envelope.metadata.get("Timestamp").map(String::as_str),
            Some("2026-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_subject_round_trip() {
        let sealed = seal_subject("Quarterly numbers", "Quantum Encrypted");
        assert!(sealed.contains("[Quantum Encrypted]"));
        assert_eq!(display_subject(&sealed), "Quarterly numbers");
    }

    #[test]
    fn test_display_subject_plain_passthrough() {
        assert_eq!(display_subject("Lunch?"), "Lunch?");
        assert_eq!(display_subject("\u{1F510} [Encrypted]"), "(No subject)");
    }
}
