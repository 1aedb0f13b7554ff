use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::transport::INPUT_EXTENSION;
use crate::data::InputRecord;
use crate::errors::ConvertError;

/// Collect input records from files and directories, in submission order.
///
/// Explicit file paths are taken as given (in argument order). Directories are
/// walked for `*.json` files, which are appended sorted by path so repeated
/// runs submit the same order.
pub fn collect_input_records(paths: &[PathBuf]) -> Result<Vec<InputRecord>, ConvertError> {
    let mut records = Vec::new();
    for path in paths {
        if path.is_dir() {
            for file in json_files_under(path) {
                records.push(read_input_record(&file)?);
            }
        } else if path.is_file() {
            records.push(read_input_record(path)?);
        } else {
            return Err(ConvertError::Configuration(format!(
                "input path '{}' does not exist",
                path.display()
            )));
        }
    }
    debug!("[cubostats:fs] collected {} input file(s)", records.len());
    Ok(records)
}

/// Read one export file into an `InputRecord` keyed by its filename.
pub fn read_input_record(path: &Path) -> Result<InputRecord, ConvertError> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            ConvertError::Configuration(format!("input path '{}' has no filename", path.display()))
        })?;
    let raw_text = fs::read_to_string(path)?;
    Ok(InputRecord::from_filename(&filename, raw_text))
}

/// True if the path has a `.json` extension (case-insensitive).
pub fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(INPUT_EXTENSION))
        .unwrap_or(false)
}

fn json_files_under(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("[cubostats:fs] skipping unreadable directory entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_json_file(entry.path()))
        .map(|entry| entry.path().to_path_buf())
        .collect();
    files.sort();
    files
}
