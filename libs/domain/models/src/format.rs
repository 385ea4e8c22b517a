// [libs/domain/models/src/format.rs]
//! Supported container formats (§6) and the geometry-kind tag used across
//! the cleaner, the quality reporter and the format driver layer.

use serde::{Deserialize, Serialize};

/// Output formats the conversion pipeline can write (§6). Persisted as the
/// OGR driver name discriminant, matching
/// `original_source/saas/backend/app/services/gdal_processor.py::FORMAT_CONFIG` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    GeoJson,
    Shapefile,
    GeoPackage,
    Kml,
    Dxf,
    Csv,
    FileGdb,
    FlatGeobuf,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "GeoJSON" => OutputFormat::GeoJson,
            "ESRI Shapefile" => OutputFormat::Shapefile,
            "GPKG" => OutputFormat::GeoPackage,
            "KML" => OutputFormat::Kml,
            "DXF" => OutputFormat::Dxf,
            "CSV" => OutputFormat::Csv,
            "OpenFileGDB" => OutputFormat::FileGdb,
            "FlatGeobuf" => OutputFormat::FlatGeobuf,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::GeoJson => "GeoJSON",
            OutputFormat::Shapefile => "ESRI Shapefile",
            OutputFormat::GeoPackage => "GPKG",
            OutputFormat::Kml => "KML",
            OutputFormat::Dxf => "DXF",
            OutputFormat::Csv => "CSV",
            OutputFormat::FileGdb => "OpenFileGDB",
            OutputFormat::FlatGeobuf => "FlatGeobuf",
        }
    }

    /// The OGR driver name this format maps to.
    pub fn ogr_driver(self) -> &'static str {
        self.as_str()
    }

    /// Default output extension.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::GeoJson => ".geojson",
            OutputFormat::Shapefile => ".shp",
            OutputFormat::GeoPackage => ".gpkg",
            OutputFormat::Kml => ".kml",
            OutputFormat::Dxf => ".dxf",
            OutputFormat::Csv => ".csv",
            OutputFormat::FileGdb => ".gdb",
            OutputFormat::FlatGeobuf => ".fgb",
        }
    }

    /// Whether the written artifact is a single file, or whether it must be
    /// packaged (ZIP) before it can be handed to a client (§4.6).
    pub fn is_single_file(self) -> bool {
        !matches!(self, OutputFormat::Shapefile | OutputFormat::FileGdb)
    }

    /// Extension of the *user-facing* download artifact, after packaging.
    pub fn download_extension(self) -> &'static str {
        if self.is_single_file() {
            self.extension()
        } else {
            ".zip"
        }
    }
}

/// Output text encoding (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Encoding {
    Utf8,
    Latin1,
}

impl Encoding {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "UTF-8" | "UTF8" => Some(Encoding::Utf8),
            "LATIN-1" | "LATIN1" | "ISO-8859-1" => Some(Encoding::Latin1),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Latin1 => "latin-1",
        }
    }
}

/// Dominant geometry kind of a dataset (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
    Unknown,
}

impl GeometryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "Point",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::LineString => "LineString",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPolygon => "MultiPolygon",
            GeometryKind::Unknown => "Unknown",
        }
    }
}
