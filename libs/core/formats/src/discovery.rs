// [libs/core/formats/src/discovery.rs]
//! Output format discovery (§4.6).

use geoconvert_domain_models::format::OutputFormat;

pub struct FormatInfo {
    pub format: OutputFormat,
    pub driver: &'static str,
    pub extension: &'static str,
    pub multi_file: bool,
}

pub const ALL_FORMATS: &[OutputFormat] = &[
    OutputFormat::GeoJson,
    OutputFormat::Shapefile,
    OutputFormat::GeoPackage,
    OutputFormat::Kml,
    OutputFormat::Dxf,
    OutputFormat::Csv,
    OutputFormat::FileGdb,
    OutputFormat::FlatGeobuf,
];

pub fn list_supported_formats() -> Vec<FormatInfo> {
    ALL_FORMATS
        .iter()
        .map(|&format| FormatInfo {
            format,
            driver: format.ogr_driver(),
            extension: format.extension(),
            multi_file: !format.is_single_file(),
        })
        .collect()
}
