// [libs/domain/jobs/src/filename.rs]
//! User-facing filename derivation for artifact retrieval (§4.9).

use std::path::Path;

use geoconvert_domain_models::format::OutputFormat;

/// `original filename stem + "_converted" + format-appropriate extension`.
pub fn derive_download_filename(original_filename: &str, output_format: OutputFormat) -> String {
    let stem = Path::new(original_filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact");
    format!("{stem}_converted{}", output_format.download_extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_expected_name_for_zip_packaged_format() {
        let name = derive_download_filename("parcels.geojson", OutputFormat::Shapefile);
        assert_eq!(name, "parcels_converted.zip");
    }

    #[test]
    fn derives_expected_name_for_single_file_format() {
        let name = derive_download_filename("parcels.zip", OutputFormat::GeoJson);
        assert_eq!(name, "parcels_converted.geojson");
    }
}
