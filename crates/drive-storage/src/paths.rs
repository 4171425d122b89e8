//! Storage path generation and validation.
//!
//! A storage path is a single flat segment: `<uuid-v7 simple>_<name>`,
//! where `<name>` is the original file name with anything that could
//! address another location replaced by `_`.

use uuid::Uuid;

/// Longest sanitized name kept in a storage path, in characters.
const MAX_NAME_CHARS: usize = 100;

/// Generate a fresh storage path for a file with the given original name.
pub fn generate(original_name: &str) -> String {
    format!("{}_{}", Uuid::now_v7().simple(), sanitize(original_name))
}

/// Replace path separators, control characters and leading dots.
pub fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .take(MAX_NAME_CHARS)
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "blob".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Whether `path` is a single segment that stays inside the blob root.
pub fn is_valid(path: &str) -> bool {
    !path.is_empty()
        && path != "."
        && path != ".."
        && !path.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique_and_keeps_name() {
        let a = generate("report.pdf");
        let b = generate("report.pdf");
        assert_ne!(a, b);
        assert!(a.ends_with("_report.pdf"));
        assert_eq!(a.len(), 32 + 1 + "report.pdf".len());
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(sanitize("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize("..\\secret"), "_secret");
        assert_eq!(sanitize(".hidden"), "hidden");
        assert_eq!(sanitize("   "), "blob");
        assert!(is_valid(&generate("../../etc/passwd")));
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("0190_a.txt"));
        assert!(!is_valid(""));
        assert!(!is_valid(".."));
        assert!(!is_valid("a/b"));
        assert!(!is_valid("a\\b"));
    }
}
