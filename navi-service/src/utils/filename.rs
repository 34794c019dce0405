//! Upload filename handling.

use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for authority identity documents.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "png", "jpg", "jpeg"];

/// True when `filename` ends in an allowed extension (case-insensitive).
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reduce `filename` to a flat, ASCII-only name safe to join onto a directory.
///
/// Accented letters are decomposed (NFKD) and lose their marks. Path
/// separators and whitespace become `_`, anything outside `[A-Za-z0-9_.-]`
/// is dropped, and leading/trailing `.` and `_` are trimmed, so
/// `../../etc/passwd` becomes `etc_passwd`.
pub fn secure_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Stored name for an uploaded document: `{username}_{unix_ts}_{original}`, sanitized.
pub fn stored_document_name(username: &str, unix_timestamp: i64, original: &str) -> String {
    secure_filename(&format!("{}_{}_{}", username, unix_timestamp, original))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_extensions_ignore_case() {
        assert!(has_allowed_extension("licence.pdf"));
        assert!(has_allowed_extension("scan.JPEG"));
        assert!(has_allowed_extension("archive.tar.png"));
    }

    #[test]
    fn disallowed_or_missing_extensions_are_rejected() {
        assert!(!has_allowed_extension("installer.exe"));
        assert!(!has_allowed_extension("pdf"));
        assert!(!has_allowed_extension("notes.pdf.exe"));
        assert!(!has_allowed_extension(""));
    }

    #[test]
    fn traversal_and_spaces_are_flattened() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("My Depot ID.pdf"), "My_Depot_ID.pdf");
        assert_eq!(secure_filename("C:\\scans\\id.png"), "C_scans_id.png");
    }

    #[test]
    fn accents_are_folded_and_other_non_ascii_dropped() {
        assert_eq!(secure_filename("ñandú.jpg"), "nandu.jpg");
        assert_eq!(secure_filename("ﬁle①.pdf"), "file1.pdf");
        assert_eq!(secure_filename("日本 scan.png"), "scan.png");
    }

    #[test]
    fn stored_name_embeds_username_and_timestamp() {
        assert_eq!(
            stored_document_name("depot_admin", 1717236000, "staff id.pdf"),
            "depot_admin_1717236000_staff_id.pdf"
        );
    }
}
