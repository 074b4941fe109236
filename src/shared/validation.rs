use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for externally supplied identifiers (project ids, account ids)
    /// These end up inside object-store keys, so no slashes or whitespace
    /// - Valid: "proj-123", "PRJ_2024.01", "a"
    /// - Invalid: "-proj", "proj/123", "proj 123", ""
    pub static ref EXTERNAL_ID_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,127}$").unwrap();

    /// Regex for folder, file and repository display names
    /// Anything printable except path separators
    /// - Valid: "Reports 2024", "final.v2.pdf", "ảnh"
    /// - Invalid: "a/b", "a\\b", "line\nbreak", "del\x7f"
    pub static ref NAME_REGEX: Regex = Regex::new(r"^[^/\\\x00-\x1f\x7f]+$").unwrap();

    /// Regex for media types stored with a file and echoed as `Content-Type`
    /// - Valid: "text/plain", "application/vnd.ms-excel", "image/svg+xml"
    /// - Invalid: "text", "text/plain; charset=utf-8", "text/plain\nX-Evil: 1"
    pub static ref MIME_TYPE_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._+-]+/[A-Za-z0-9._+-]+$").unwrap();
}
