// [libs/core/formats/src/packaging.rs]
//! Packaging of multi-file outputs into a single ZIP (§4.6), ported from
//! `original_source/saas/backend/app/services/gdal_processor.py::_package_if_needed`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use geoconvert_domain_models::format::OutputFormat;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::FormatError;

/// For single-file formats, returns `output_path` unchanged. For shapefile
/// and FileGDB, zips up the sibling files (shapefile) or the directory
/// contents (FileGDB) and returns the ZIP path.
pub fn package_if_needed(
    output_path: &Path,
    output_format: OutputFormat,
) -> Result<PathBuf, FormatError> {
    if output_format.is_single_file() {
        return Ok(output_path.to_path_buf());
    }

    let zip_path = output_path.with_extension("zip");
    let zip_file = fs::File::create(&zip_path)?;
    let mut writer = ZipWriter::new(zip_file);
    let options = FileOptions::<()>::default();

    match output_format {
        OutputFormat::Shapefile => {
            let stem = output_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let parent = output_path.parent().unwrap_or_else(|| Path::new("."));
            for entry in fs::read_dir(parent)? {
                let entry = entry?;
                let path = entry.path();
                let matches_stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s == stem)
                    .unwrap_or(false);
                if matches_stem && path.is_file() {
                    let name = path.file_name().unwrap().to_string_lossy().to_string();
                    writer.start_file(name, options)?;
                    writer.write_all(&fs::read(&path)?)?;
                }
            }
        }
        OutputFormat::FileGdb => {
            add_directory_recursive(&mut writer, output_path, output_path, options)?;
        }
        _ => unreachable!("is_single_file() already filtered non-multi-file formats"),
    }

    writer.finish()?;
    Ok(zip_path)
}

fn add_directory_recursive(
    writer: &mut ZipWriter<fs::File>,
    root: &Path,
    dir: &Path,
    options: FileOptions<'_, ()>,
) -> Result<(), FormatError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            add_directory_recursive(writer, root, &path, options)?;
        } else {
            let relative = path.strip_prefix(root.parent().unwrap_or(root)).unwrap_or(&path);
            writer.start_file(relative.to_string_lossy(), options)?;
            writer.write_all(&fs::read(&path)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_formats_pass_through() {
        let path = Path::new("/tmp/out.geojson");
        let result = package_if_needed(path, OutputFormat::GeoJson).unwrap();
        assert_eq!(result, path);
    }

    #[test]
    fn shapefile_siblings_get_zipped() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("out");
        for ext in ["shp", "dbf", "shx", "prj"] {
            fs::write(base.with_extension(ext), b"data").unwrap();
        }
        let shp_path = base.with_extension("shp");
        let zip_path = package_if_needed(&shp_path, OutputFormat::Shapefile).unwrap();
        assert_eq!(zip_path.extension().unwrap(), "zip");
        assert!(zip_path.exists());

        let file = fs::File::open(&zip_path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 4);
    }
}
