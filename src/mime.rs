//! Raw RFC 822 message handling: pull the body text and declared content
//! type out of an `.eml` so it can be classified and decoded.
//!
//! Uses `mail-parser` internally, with a fallback for messages it cannot
//! parse.

use mail_parser::MessageParser;

/// Body text extracted from a raw message, plus the content type the
/// message declared for it (the classifier's declared-type hint).
#[derive(Debug, Clone)]
pub struct ExtractedBody {
    pub text: String,
    pub declared_type: Option<String>,
}

/// Extract the body of a raw RFC 822 message.
///
/// Prefers the `text/plain` part; falls back to the HTML part (converted
/// to text) and finally to everything after the header block. Envelope
/// markers survive all three paths because they are plain lines in the
/// body.
pub fn body_from_raw(raw: &[u8]) -> ExtractedBody {
    let parser = MessageParser::default();
    match parser.parse(raw) {
        Some(msg) => {
            if let Some(text) = msg.body_text(0) {
                return ExtractedBody {
                    text: text.into_owned(),
                    declared_type: Some("text/plain".to_string()),
                };
            }
            if let Some(html) = msg.body_html(0) {
                return ExtractedBody {
                    text: html_to_text(&html),
                    declared_type: Some("text/html".to_string()),
                };
            }
            ExtractedBody {
                text: String::new(),
                declared_type: None,
            }
        }
        None => {
            tracing::debug!("mail-parser could not parse message, using raw fallback");
            ExtractedBody {
                text: body_fallback(raw),
                declared_type: None,
            }
        }
    }
}

/// Everything after the first blank line, when proper parsing fails.
fn body_fallback(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    if let Some(pos) = text.find("\r\n\r\n") {
        text[pos + 4..].to_string()
    } else if let Some(pos) = text.find("\n\n") {
        text[pos + 2..].to_string()
    } else {
        text.into_owned()
    }
}

/// Minimal HTML-to-text conversion for displaying markup bodies.
///
/// Block elements become newlines, remaining tags are stripped, and the
/// common entities are decoded.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();

    for tag in &["<br>", "<br/>", "<br />", "</p>", "</div>", "</li>", "</tr>"] {
        text = text.replace(tag, "\n");
        text = text.replace(&tag.to_uppercase(), "\n");
    }

    let mut result = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result = result
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    // Collapse runs of blank lines left behind by stripped blocks
    let mut out = String::with_capacity(result.len());
    let mut blank_run = 0;
    for line in result.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.trim().to_string()
}
