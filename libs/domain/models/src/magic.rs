// [libs/domain/models/src/magic.rs]
//! File signature checks, ported from
//! `original_source/saas/backend/app/core/security.py::MAGIC_BYTES`.
//! DXF is plain text and carries no signature, matching the original.

/// Returns the expected leading bytes for an extension, or `None` if the
/// format is unchecked.
pub fn expected_magic(extension: &str) -> Option<&'static [u8]> {
    match extension.to_ascii_lowercase().as_str() {
        "zip" => Some(b"PK\x03\x04"),
        "gpkg" => Some(b"SQLite format 3"),
        "geojson" => Some(b"{"),
        "kml" => Some(b"<?xml"),
        _ => None,
    }
}

/// Validates that `data` starts with the signature expected for `extension`.
/// Extensions with no known signature (e.g. `dxf`, `csv`, `shp`) always pass.
pub fn validate_file_magic(extension: &str, data: &[u8]) -> bool {
    match expected_magic(extension) {
        Some(sig) => data.starts_with(sig),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_signature_accepted() {
        assert!(validate_file_magic("zip", b"PK\x03\x04rest"));
    }

    #[test]
    fn zip_signature_rejected() {
        assert!(!validate_file_magic("zip", b"not a zip"));
    }

    #[test]
    fn geojson_leading_brace() {
        assert!(validate_file_magic("geojson", b"{\"type\":\"FeatureCollection\"}"));
        assert!(!validate_file_magic("geojson", b"<html>"));
    }

    #[test]
    fn dxf_is_unchecked() {
        assert!(validate_file_magic("dxf", b"anything at all"));
    }
}
