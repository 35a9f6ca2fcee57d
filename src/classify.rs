//! Content classification for received email bodies.
//!
//! A pure function of the body text (plus an optional declared
//! content-type hint) deciding which decode path applies. Classifying the
//! same body twice always yields the same result.

use crate::codec::envelope;

/// Terminal classification of an email body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// The envelope codec can extract a metadata/payload pair.
    /// Takes precedence over everything else.
    Encrypted,
    /// Recognizable markup, or the declared content type says so.
    Markup,
    /// Neither of the above.
    PlainText,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Encrypted => write!(f, "encrypted"),
            ContentKind::Markup => write!(f, "markup"),
            ContentKind::PlainText => write!(f, "plain-text"),
        }
    }
}

/// Body banner tags written by the various encryption scheme versions.
///
/// Advisory only: redundant signals layered on top of marker detection,
/// never required for correct decoding.
const SCHEME_BANNERS: &[&str] = &[
    "[AES ENCRYPTED]",
    "[QKD ENCRYPTED]",
    "[AES-GCM ENCRYPTED]",
    "[AES STANDARD ENCRYPTED]",
    "[OTP ENCRYPTED]",
    "[PQC ENCRYPTED]",
];

/// Markup fragments that mark a body as HTML.
const MARKUP_HINTS: &[&str] = &[
    "<!doctype", "<html", "<body", "<div", "<p>", "<p ", "<br", "<table", "<span", "<a href",
];

/// Classify a body, optionally informed by a declared content type
/// (e.g. the message's `Content-Type` header value).
pub fn classify(body: &str, declared_type: Option<&str>) -> ContentKind {
    if envelope::extract(body).is_ok() {
        return ContentKind::Encrypted;
    }
    let declared_markup = declared_type
        .map(|t| t.to_ascii_lowercase().contains("html"))
        .unwrap_or(false);
    if declared_markup || looks_like_markup(body) {
        return ContentKind::Markup;
    }
    ContentKind::PlainText
}

/// Heuristic encrypted-mail detection over subject and body.
///
/// Mirrors what mail-list views need before any decoding happens: the
/// lock prefix or bracketed `[... Encrypted]` subject tag, a scheme
/// banner, or either envelope marker appearing in the body. This is a
/// hint for list rendering — actual decoding always goes through
/// [`envelope::extract`].
pub fn looks_encrypted(subject: Option<&str>, body: &str) -> bool {
    if let Some(subject) = subject {
        if subject.contains('\u{1F510}')
            || subject.contains("[Encrypted]")
            || subject.contains("[Quantum Encrypted]")
        {
            return true;
        }
    }
    body.contains(envelope::METADATA_OPEN)
        || body.contains(envelope::PAYLOAD_OPEN)
        || SCHEME_BANNERS.iter().any(|tag| body.contains(tag))
}

fn looks_like_markup(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    MARKUP_HINTS.iter().any(|tag| lower.contains(tag))
}
