//! `mailseal` — text-safe envelope and compression codec for encrypted
//! email.
//!
//! Email transport only carries text. This crate serializes binary
//! content (voice recordings, file attachments) and an externally
//! produced encrypted payload into marker-delimited text blocks that fit
//! in a plain email body, and re-extracts everything byte-for-byte on
//! the receiving side. Encryption itself is an external collaborator:
//! the envelope carries the ciphertext as an opaque text blob.

pub mod capture;
pub mod classify;
pub mod codec;
pub mod compose;
pub mod config;
pub mod error;
pub mod export;
pub mod mime;
pub mod model;

pub use error::{Result, SealError};
