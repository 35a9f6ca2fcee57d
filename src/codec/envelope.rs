//! Envelope codec: wrapping an externally encrypted payload and its
//! metadata in marker-delimited blocks inside a free-text email body.
//!
//! The markers are literal, human-readable anchors. The decoder is a
//! tolerant scan: it ignores everything outside the blocks (subject
//! echoes, quoted replies, signatures) and accepts both payload close
//! markers that exist in the wild. User text containing a literal marker
//! string will confuse it — a known limitation of the wire format, kept
//! for compatibility.

use std::collections::BTreeMap;

use crate::error::{Result, SealError};
use crate::model::{Envelope, Metadata};

/// Opens the metadata block.
pub const METADATA_OPEN: &str = "--- ENCRYPTED METADATA ---";
/// Closes the metadata block.
pub const METADATA_CLOSE: &str = "--- END METADATA ---";
/// Opens the payload block.
pub const PAYLOAD_OPEN: &str = "--- ENCRYPTED PAYLOAD ---";
/// Canonical payload close marker (what this encoder emits).
pub const PAYLOAD_CLOSE: &str = "--- END ENCRYPTED MESSAGE ---";
/// Alternate payload close marker used by older scheme versions.
/// The decoder accepts either; nobody documented which version wrote
/// which, so both stay.
pub const PAYLOAD_CLOSE_ALT: &str = "--- END PAYLOAD ---";

/// Build an envelope body: metadata block, blank line, payload block.
///
/// Metadata is serialized as `key: value` lines in map order. The payload
/// is wrapped at `wrap_width` columns for email-client readability
/// (0 disables wrapping) — safe because the decoder strips all whitespace
/// from the payload block.
pub fn build(metadata: &Metadata, payload: &str, wrap_width: usize) -> String {
    let mut out = String::new();
    out.push_str(METADATA_OPEN);
    out.push('\n');
    for (key, value) in metadata {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str(METADATA_CLOSE);
    out.push_str("\n\n");
    out.push_str(PAYLOAD_OPEN);
    out.push('\n');
    out.push_str(&wrap(payload, wrap_width));
    out.push('\n');
    out.push_str(PAYLOAD_CLOSE);
    out
}

/// Extract metadata and payload from a received body.
///
/// Three steps, each with its own failure mode:
/// 1. metadata block — open marker absent means this body is simply not
///    an envelope ([`SealError::NoEnvelope`]); open without close is a
///    cut-off message ([`SealError::TruncatedEnvelope`]);
/// 2. payload block — located after the metadata, same truncation rules;
/// 3. whitespace stripping — the payload may have been line-wrapped for
///    display, so every whitespace character is removed before the text
///    is handed to the external decryptor.
pub fn extract(body: &str) -> Result<Envelope> {
    let meta_start = body.find(METADATA_OPEN).ok_or(SealError::NoEnvelope)?;
    let after_meta_open = &body[meta_start + METADATA_OPEN.len()..];

    let meta_end = after_meta_open
        .find(METADATA_CLOSE)
        .ok_or(SealError::TruncatedEnvelope {
            expected: METADATA_CLOSE,
        })?;
    let meta_text = after_meta_open[..meta_end].trim();
    let after_meta = &after_meta_open[meta_end + METADATA_CLOSE.len()..];

    let payload_start =
        after_meta
            .find(PAYLOAD_OPEN)
            .ok_or(SealError::TruncatedEnvelope {
                expected: PAYLOAD_OPEN,
            })?;
    let after_payload_open = &after_meta[payload_start + PAYLOAD_OPEN.len()..];

    let payload_end = find_payload_close(after_payload_open).ok_or(
        SealError::TruncatedEnvelope {
            expected: PAYLOAD_CLOSE,
        },
    )?;
    let payload: String = after_payload_open[..payload_end]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let metadata = parse_metadata(meta_text);
    tracing::debug!(
        keys = metadata.len(),
        payload_len = payload.len(),
        "extracted envelope"
    );

    Ok(Envelope { metadata, payload })
}

/// Position of the earliest accepted payload close marker.
fn find_payload_close(text: &str) -> Option<usize> {
    match (text.find(PAYLOAD_CLOSE), text.find(PAYLOAD_CLOSE_ALT)) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

// ── Metadata parsing ────────────────────────────────────────────

/// Ordered metadata parse strategies.
///
/// Different scheme versions in the wild wrote different metadata
/// formats without any version negotiation, so the decoder tries each
/// strategy in sequence and takes the first that succeeds. The order is
/// the compatibility contract: JSON is unambiguous when present, the
/// line-based form accepts anything.
const STRATEGIES: &[(&str, fn(&str) -> Option<Metadata>)] = &[
    ("json-object", parse_json_metadata),
    ("key-value-lines", parse_key_value_metadata),
];

fn parse_metadata(text: &str) -> Metadata {
    for (name, strategy) in STRATEGIES {
        if let Some(map) = strategy(text) {
            tracing::trace!(strategy = name, "metadata parsed");
            return map;
        }
    }
    // key-value-lines never fails, but keep the fallthrough total.
    Metadata::new()
}

/// Strategy 1: the whole block is a JSON object.
fn parse_json_metadata(text: &str) -> Option<Metadata> {
    let value: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text).ok()?;
    Some(
        value
            .into_iter()
            .map(|(k, v)| {
                let s = match v {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, s)
            })
            .collect(),
    )
}

/// Strategy 2: line-based `key: value` pairs.
///
/// Permissive by design — lines without a colon are skipped, values keep
/// any colons after the first (timestamps depend on this).
fn parse_key_value_metadata(text: &str) -> Option<Metadata> {
    let mut map = BTreeMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Some(map)
}

/// Wrap to `width` characters per line, never splitting a code point.
fn wrap(text: &str, width: usize) -> String {
    if width == 0 || text.len() <= width {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + text.len() / width);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && i % width == 0 {
            out.push('\n');
        }
        out.push(ch);
    }
    out
}
