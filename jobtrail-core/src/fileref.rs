//! Document file references.
//!
//! A document points at its content through a `file_url`: either an
//! external link left as-is, or a small local file embedded as a
//! `data:` URL so the record is self-contained.

use base64::Engine;
use std::path::Path;

use crate::error::{Error, Result};

/// Refuse to embed files past this size; large uploads should stay
/// external references.
pub const MAX_EMBED_BYTES: u64 = 2 * 1024 * 1024;

/// Guess a MIME type from the file extension.
fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

/// Embed a local file as a `data:` URL.
pub fn to_data_url(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > MAX_EMBED_BYTES {
        return Err(Error::Validation(format!(
            "{} is too large to embed ({} bytes, limit {}); store it as a URL instead",
            path.display(),
            metadata.len(),
            MAX_EMBED_BYTES
        )));
    }

    let bytes = std::fs::read(path)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{};base64,{}", mime_for(path), encoded))
}

/// Whether a file reference is an embedded data URL (as opposed to an
/// external link).
pub fn is_data_url(file_url: &str) -> bool {
    file_url.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embed_small_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"hello").unwrap();

        let url = to_data_url(file.path()).unwrap();
        assert_eq!(url, "data:text/plain;base64,aGVsbG8=");
        assert!(is_data_url(&url));
    }

    #[test]
    fn test_mime_guess_by_extension() {
        assert_eq!(mime_for(Path::new("resume.pdf")), "application/pdf");
        assert_eq!(mime_for(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("mystery")), "application/octet-stream");
    }

    #[test]
    fn test_external_url_is_not_data_url() {
        assert!(!is_data_url("https://example.com/resume.pdf"));
    }
}
