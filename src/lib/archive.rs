use super::error::ImportError;
use std::io::{Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const RESOURCE_FORK_DIR: &str = "__MACOSX/";

fn has_extension(name: &str, extension: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

pub(crate) fn is_shapefile_entry(name: &str) -> bool {
    !name.starts_with(RESOURCE_FORK_DIR) && !name.ends_with('/') && has_extension(name, "shp")
}

pub fn check_extension(file_name: &str) -> Result<(), ImportError> {
    if has_extension(file_name, "zip") {
        Ok(())
    } else {
        Err(ImportError::NotZip {
            file_name: file_name.into(),
        })
    }
}

/// Names of the `.shp` entries of a zip archive.
pub fn shapefile_entries(reader: impl Read + Seek) -> Result<Vec<String>, ImportError> {
    let archive = ZipArchive::new(reader)?;
    let entries: Vec<String> = archive
        .file_names()
        .filter(|name| is_shapefile_entry(name))
        .map(String::from)
        .collect();
    if entries.is_empty() {
        return Err(ImportError::NoShapefile);
    }
    Ok(entries)
}
