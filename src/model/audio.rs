//! Voice recording block types.

use super::blob::CompressedBlob;

/// A compressed audio recording with its container MIME type.
///
/// The MIME type round-trips exactly as transmitted. The sender's device
/// picks the recording container (`audio/webm`, `audio/mp4`, ...) and the
/// receiver must honor it — the codec never substitutes a default for a
/// transmitted type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBlock {
    /// Codec/container identifier, e.g. `"audio/webm;codecs=opus"`.
    pub mime_type: String,

    /// The compressed recording.
    pub blob: CompressedBlob,
}

/// A reconstructed recording, ready to hand to a media layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    pub mime_type: String,
    pub data: Vec<u8>,
}
