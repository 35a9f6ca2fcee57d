//! Write reconstructed attachments and recordings to disk.

use std::path::{Path, PathBuf};

use crate::error::{Result, SealError};
use crate::model::{DecodedAttachment, DecodedAudio};

/// Write a single reconstructed attachment into `output_dir`.
///
/// The declared name is sanitized first — manifest names are untrusted
/// and must never traverse directories.
pub fn write_attachment(attachment: &DecodedAttachment, output_dir: &Path) -> Result<PathBuf> {
    let filename = sanitize_filename(&attachment.name);
    let path = unique_path(&output_dir.join(filename));
    std::fs::write(&path, &attachment.data).map_err(|e| SealError::io(&path, e))?;
    tracing::info!(
        path = %path.display(),
        mime_type = %attachment.mime_type,
        size = attachment.data.len(),
        "wrote attachment"
    );
    Ok(path)
}

/// Write a reconstructed recording into `output_dir`, with an extension
/// derived from its transmitted MIME type.
pub fn write_recording(recording: &DecodedAudio, output_dir: &Path) -> Result<PathBuf> {
    let name = format!("recording.{}", extension_for_mime(&recording.mime_type));
    let path = unique_path(&output_dir.join(name));
    std::fs::write(&path, &recording.data).map_err(|e| SealError::io(&path, e))?;
    tracing::info!(
        path = %path.display(),
        mime_type = %recording.mime_type,
        size = recording.data.len(),
        "wrote recording"
    );
    Ok(path)
}

/// Flatten a declared attachment name into a safe single file name.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').trim();
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Avoid overwriting — append a counter if the path already exists.
fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));

    for n in 1.. {
        let candidate = parent.join(format!("{stem}_{n}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!()
}

/// File extension for an audio container MIME type.
/// Parameters (`;codecs=...`) don't affect the container extension.
pub fn extension_for_mime(mime: &str) -> &'static str {
    let base = mime.split(';').next().unwrap_or(mime).trim();
    match base {
        "audio/webm" => "webm",
        "audio/mp4" => "m4a",
        "audio/mpeg" => "mp3",
        "audio/ogg" => "ogg",
        "audio/wav" => "wav",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_traversal_attempts() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("..\\evil.exe"), "_evil.exe");
        assert_eq!(sanitize_filename(""), "attachment");
        assert_eq!(sanitize_filename("report.pdf"), "report.pdf");
    }

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("audio/webm"), "webm");
        assert_eq!(extension_for_mime("audio/webm;codecs=opus"), "webm");
        assert_eq!(extension_for_mime("audio/x-unknown"), "bin");
    }

    #[test]
    fn test_write_and_collision_counter() {
        let dir = tempfile::tempdir().unwrap();
        let attachment = DecodedAttachment {
            name: "a.txt".into(),
            mime_type: "text/plain".into(),
            data: b"one".to_vec(),
        };
        let first = write_attachment(&attachment, dir.path()).unwrap();
        let second = write_attachment(&attachment, dir.path()).unwrap();
        assert_eq!(first.file_name().unwrap(), "a.txt");
        assert_eq!(second.file_name().unwrap(), "a_1.txt");
        assert_eq!(std::fs::read(&second).unwrap(), b"one");
    }

    #[test]
    fn test_write_recording_uses_mime_extension() {
        let dir = tempfile::tempdir().unwrap();
        let recording = DecodedAudio {
            mime_type: "audio/mp4".into(),
            data: vec![1, 2, 3],
        };
        let path = write_recording(&recording, dir.path()).unwrap();
        assert_eq!(path.extension().unwrap(), "m4a");
    }
}
