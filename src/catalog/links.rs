//! Object-storage share link normalization
//!
//! Images are often pasted as Google Drive share links, which point at a
//! viewer page rather than the image. Two known shapes are rewritten to the
//! direct-view form; everything else passes through.

use regex::Regex;
use std::sync::LazyLock;

const DIRECT_VIEW_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";

/// `https://drive.google.com/file/d/<ID>/view?usp=sharing`
static FILE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://drive\.google\.com/file/d/([A-Za-z0-9_-]+)").expect("valid regex")
});

/// `https://drive.google.com/open?id=<ID>`
static OPEN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://drive\.google\.com/open\?(?:.*&)?id=([A-Za-z0-9_-]+)")
        .expect("valid regex")
});

/// Rewrite a Drive share link to a direct-view URL.
///
/// Non-matching or empty input is returned unchanged (trimmed), so the
/// function is idempotent.
pub fn normalize_drive_link(url: &str) -> String {
    let url = url.trim();

    if let Some(id) = drive_file_id(url) {
        return format!("{DIRECT_VIEW_PREFIX}{id}");
    }

    url.to_string()
}

/// Extract the file ID from either known share-link shape
pub fn drive_file_id(url: &str) -> Option<&str> {
    FILE_LINK
        .captures(url)
        .or_else(|| OPEN_LINK.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_link() {
        assert_eq!(
            normalize_drive_link("https://drive.google.com/file/d/ABC123/view"),
            "https://drive.google.com/uc?export=view&id=ABC123"
        );
    }

    #[test]
    fn test_file_link_with_query() {
        assert_eq!(
            normalize_drive_link("https://drive.google.com/file/d/1a-B_c/view?usp=sharing"),
            "https://drive.google.com/uc?export=view&id=1a-B_c"
        );
    }

    #[test]
    fn test_both_shapes_agree() {
        let a = normalize_drive_link("https://drive.google.com/file/d/XYZ987/view?usp=drive_link");
        let b = normalize_drive_link("https://drive.google.com/open?id=XYZ987");
        assert_eq!(a, b);
    }

    #[test]
    fn test_open_link_with_other_params() {
        assert_eq!(
            normalize_drive_link("https://drive.google.com/open?usp=sharing&id=XYZ987"),
            "https://drive.google.com/uc?export=view&id=XYZ987"
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "https://drive.google.com/file/d/ABC123/view",
            "https://drive.google.com/open?id=ABC123",
            "https://example.com/image.png",
            "",
        ];
        for input in inputs {
            let once = normalize_drive_link(input);
            assert_eq!(normalize_drive_link(&once), once, "input: {input}");
        }
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(
            normalize_drive_link("https://images.example.com/75192.jpg"),
            "https://images.example.com/75192.jpg"
        );
        assert_eq!(normalize_drive_link(""), "");
        assert_eq!(normalize_drive_link("  not a url "), "not a url");
    }

    #[test]
    fn test_drive_file_id_none_for_other_hosts() {
        assert_eq!(drive_file_id("https://example.com/file/d/ABC/view"), None);
    }
}
