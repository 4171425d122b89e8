//! Typed path parameter helpers.

use uuid::Uuid;

use drive_core::error::AppError;
use drive_entity::node::NodeKind;

/// Parses a UUID from a path segment or body field.
pub fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(s.trim()).map_err(|_| AppError::validation(format!("Invalid id: {s}")))
}

/// Parses a required `type` value.
pub fn parse_kind(s: Option<&str>) -> Result<NodeKind, AppError> {
    match s.map(str::trim) {
        None | Some("") => Err(AppError::validation("type is required ('file' or 'folder')")),
        Some(value) => value.parse(),
    }
}

/// Builds an `attachment` Content-Disposition value for a file name.
///
/// The quoted `filename` is reduced to printable ASCII; `filename*` carries
/// the exact UTF-8 name.
pub fn content_disposition(name: &str) -> String {
    let ascii: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    let ascii = if ascii.trim().is_empty() {
        "download".to_string()
    } else {
        ascii
    };

    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind(Some("file")).unwrap(), NodeKind::File);
        assert!(parse_kind(None).is_err());
        assert!(parse_kind(Some("")).is_err());
        assert!(parse_kind(Some("dir")).is_err());
    }

    #[test]
    fn test_parse_uuid() {
        assert!(parse_uuid("not-a-uuid").is_err());
        assert!(parse_uuid("0190a5b2-3c4d-7e8f-9a0b-1c2d3e4f5a6b").is_ok());
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("a b.txt"),
            "attachment; filename=\"a b.txt\"; filename*=UTF-8''a%20b.txt"
        );
        assert_eq!(
            content_disposition("résumé\".pdf"),
            "attachment; filename=\"r_sum__.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9%22.pdf"
        );
    }
}
