//! Centralized error types for mailseal.

use std::path::PathBuf;
use thiserror::Error;

/// Which wire block a decode failure belongs to.
///
/// Decode and inflate errors are reported with the block that produced
/// them so the caller can tell a broken attachment from a broken payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// The encrypted payload block of an envelope.
    Payload,
    /// An `AUDIO_COMPRESSED:` block.
    Audio,
    /// An entry in a `FILES_COMPRESSED:` manifest.
    File,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Payload => write!(f, "payload"),
            BlockKind::Audio => write!(f, "audio"),
            BlockKind::File => write!(f, "file"),
        }
    }
}

/// All errors produced by the mailseal library.
#[derive(Error, Debug)]
pub enum SealError {
    /// The body has no metadata markers at all — it is not an envelope.
    /// Recoverable: treat the body as unencrypted plain content.
    #[error("body contains no encrypted envelope")]
    NoEnvelope,

    /// An open marker was found but a later marker is missing (message
    /// cut off, quoted incompletely, etc.).
    #[error("truncated envelope: expected '{expected}' marker not found")]
    TruncatedEnvelope { expected: &'static str },

    /// A `FILES_COMPRESSED:` marker was found but the content after it is
    /// not a valid manifest.
    #[error("malformed attachment manifest: {reason}")]
    ManifestParse { reason: String },

    /// An `AUDIO_COMPRESSED:` marker was found but the header that follows
    /// it is malformed.
    #[error("malformed audio block: {0}")]
    AudioHeader(String),

    /// The text in a block is not valid base64.
    #[error("invalid base64 in {block} block: {source}")]
    Decode {
        block: BlockKind,
        source: base64::DecodeError,
    },

    /// The decoded bytes in a block are not a valid compressed stream.
    #[error("corrupt compressed stream in {block} block: {source}")]
    Inflate {
        block: BlockKind,
        source: std::io::Error,
    },

    /// Decompression succeeded but produced a different number of bytes
    /// than the record declared.
    #[error("size mismatch for '{name}': expected {expected} bytes, got {actual}")]
    SizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// A single attachment in a manifest failed to reconstruct.
    /// Carries the record's position and declared name.
    #[error("attachment {index} ('{name}') failed to decode: {source}")]
    Attachment {
        index: usize,
        name: String,
        #[source]
        source: Box<SealError>,
    },

    /// An audio capture source failed mid-recording.
    #[error("audio capture failed: {source}")]
    Capture { source: std::io::Error },

    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for `Result<T, SealError>`.
pub type Result<T> = std::result::Result<T, SealError>;

impl SealError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` for failures the receive path treats as per-block and
    /// recoverable (the primary message text is still extracted).
    pub fn is_block_local(&self) -> bool {
        matches!(
            self,
            Self::ManifestParse { .. }
                | Self::AudioHeader(_)
                | Self::Decode { .. }
                | Self::Inflate { .. }
                | Self::SizeMismatch { .. }
                | Self::Attachment { .. }
        )
    }
}
