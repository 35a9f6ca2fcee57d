//! Core data model types for envelopes, compressed blobs, and attachments.

pub mod attachment;
pub mod audio;
pub mod blob;
pub mod envelope;

pub use attachment::{AttachmentRecord, DecodedAttachment};
pub use audio::{AudioBlock, DecodedAudio};
pub use blob::CompressedBlob;
pub use envelope::{Envelope, Metadata};
