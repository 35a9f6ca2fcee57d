//! Wire codecs: compression, attachment manifests, audio blocks, and the
//! encrypted envelope itself.
//!
//! Every function here is a pure, synchronous transform over its inputs —
//! no I/O, no shared state — and may be called concurrently from any
//! thread.

pub mod audio;
pub mod compress;
pub mod envelope;
pub mod manifest;
