// [libs/core/formats/src/extraction.rs]
//! Input ZIP extraction (§4.6), ported from
//! `original_source/saas/backend/app/services/gdal_processor.py::_extract_if_zip`.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::FormatError;

/// Priority order in which the principal payload is searched for inside an
/// extracted archive.
pub const SEARCH_PRIORITY: &[&str] = &["shp", "gpkg", "geojson", "kml", "gdb", "dxf", "csv"];

/// If `path` ends in `.zip`, extracts it into a fresh temp directory and
/// returns the located principal file plus a guard that removes the temp
/// directory on drop. Otherwise returns `path` unchanged with no guard.
pub fn extract_if_zip(path: &Path) -> Result<(PathBuf, Option<TempDir>), FormatError> {
    let is_zip = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);

    if !is_zip {
        return Ok((path.to_path_buf(), None));
    }

    let temp_dir = TempDir::with_prefix("geoconvert_")?;
    let file = fs::File::open(path)?;
    let mut archive = ZipArchive::new(file)?;
    archive.extract(temp_dir.path())?;

    let principal = find_principal_file(temp_dir.path())?;
    Ok((principal, Some(temp_dir)))
}

/// Walks `dir` recursively looking for the first extension in
/// [`SEARCH_PRIORITY`] order that has a match.
pub fn find_principal_file(dir: &Path) -> Result<PathBuf, FormatError> {
    let mut all_files = Vec::new();
    collect_files(dir, &mut all_files)?;

    for wanted_ext in SEARCH_PRIORITY {
        if let Some(found) = all_files.iter().find(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(wanted_ext))
                .unwrap_or(false)
        }) {
            return Ok(found.clone());
        }

        // FileGDB ships as a directory named `*.gdb`, not a file.
        if *wanted_ext == "gdb" {
            if let Some(found) = find_gdb_directory(dir)? {
                return Ok(found);
            }
        }
    }

    Err(FormatError::NoPrincipalFileInArchive)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), FormatError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

fn find_gdb_directory(dir: &Path) -> Result<Option<PathBuf>, FormatError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            let is_gdb = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("gdb"))
                .unwrap_or(false);
            if is_gdb {
                return Ok(Some(path));
            }
            if let Some(found) = find_gdb_directory(&path)? {
                return Ok(Some(found));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_zip_path_passes_through() {
        let (resolved, guard) = extract_if_zip(Path::new("/tmp/data.geojson")).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/data.geojson"));
        assert!(guard.is_none());
    }

    #[test]
    fn priority_order_prefers_shapefile_over_csv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.csv"), b"a,b\n1,2").unwrap();
        fs::write(dir.path().join("data.shp"), b"fake shp").unwrap();
        let found = find_principal_file(dir.path()).unwrap();
        assert_eq!(found.extension().unwrap(), "shp");
    }

    #[test]
    fn missing_recognized_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), b"nothing geospatial here").unwrap();
        assert!(find_principal_file(dir.path()).is_err());
    }
}
