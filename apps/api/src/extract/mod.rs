//! Text extraction from uploaded resume files.

use tracing::warn;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt"];
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Anything shorter than this after extraction is not a usable resume.
pub const MIN_RESUME_TEXT_CHARS: usize = 100;

/// Lowercased extension after the last dot, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

pub fn is_supported(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Extracts plain text from an uploaded file. Returns `None` when the file
/// is empty, unreadable, or of an unsupported type; the caller decides how
/// to report that.
pub fn extract_text(filename: &str, data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    match file_extension(filename).as_deref() {
        Some("pdf") => match pdf_extract::extract_text_from_mem(data) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                warn!("no text layer in {filename}");
                None
            }
            Err(e) => {
                warn!("failed to read {filename}: {e}");
                None
            }
        },
        Some("txt") => Some(decode_plain_text(data)),
        _ => None,
    }
}

/// UTF-8 when valid, otherwise a latin-1 reading so legacy exports still
/// come through instead of erroring.
fn decode_plain_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => data.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension_lowercases() {
        assert_eq!(file_extension("Resume.PDF"), Some("pdf".to_string()));
        assert_eq!(file_extension("notes.txt"), Some("txt".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("no_extension"), None);
        assert_eq!(file_extension("trailing."), None);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("cv.pdf"));
        assert!(is_supported("cv.TXT"));
        assert!(!is_supported("cv.docx"));
        assert!(!is_supported("cv"));
    }

    #[test]
    fn test_extract_text_from_plain_utf8() {
        let text = extract_text("cv.txt", "Python and AWS".as_bytes());
        assert_eq!(text, Some("Python and AWS".to_string()));
    }

    #[test]
    fn test_extract_text_latin1_fallback() {
        // 0xE9 is 'é' in latin-1 and invalid on its own in UTF-8.
        let data = [b'r', b'\xE9', b's', b'u', b'm', b'\xE9'];
        assert_eq!(extract_text("cv.txt", &data), Some("résumé".to_string()));
    }

    #[test]
    fn test_extract_text_rejects_empty_and_unsupported() {
        assert_eq!(extract_text("cv.pdf", &[]), None);
        assert_eq!(extract_text("cv.docx", b"some bytes"), None);
    }

    #[test]
    fn test_extract_text_garbage_pdf_is_none() {
        assert_eq!(extract_text("cv.pdf", b"this is not a pdf"), None);
    }
}
