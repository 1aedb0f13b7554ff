//! Zip packaging of generated scripts.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use indexmap::IndexMap;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::data::GeneratedOutput;
use crate::errors::ConvertError;

/// Package `outputs` into an in-memory zip archive.
///
/// One Deflate entry per distinct filename with the content stored verbatim.
/// Entry timestamps are fixed so identical outputs produce identical bytes.
/// When two outputs share a filename the later content replaces the earlier
/// one at the earlier entry's position.
pub fn build_archive(outputs: &[GeneratedOutput]) -> Result<Vec<u8>, ConvertError> {
    let mut entries: IndexMap<&str, &str> = IndexMap::new();
    for output in outputs {
        if entries
            .insert(output.filename.as_str(), output.content.as_str())
            .is_some()
        {
            warn!(
                "[cubostats:archive] duplicate entry '{}' replaced by later output",
                output.filename
            );
        }
    }

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (filename, content) in &entries {
        writer
            .start_file(*filename, options)
            .map_err(|err| ConvertError::Archive(format!("failed adding '{filename}': {err}")))?;
        writer.write_all(content.as_bytes())?;
    }
    let cursor = writer
        .finish()
        .map_err(|err| ConvertError::Archive(format!("failed finalizing archive: {err}")))?;
    Ok(cursor.into_inner())
}

/// Build the archive and write it to `path`, returning the archive size in bytes.
pub fn write_archive(path: &Path, outputs: &[GeneratedOutput]) -> Result<u64, ConvertError> {
    let bytes = build_archive(outputs)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;
    info!(
        "[cubostats:archive] wrote {} entr{} ({} bytes) -> {}",
        outputs.len(),
        if outputs.len() == 1 { "y" } else { "ies" },
        bytes.len(),
        path.display()
    );
    Ok(bytes.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OutputKind;
    use std::io::Read;
    use tempfile::tempdir;
    use zip::ZipArchive;

    fn output(filename: &str, content: &str, kind: OutputKind) -> GeneratedOutput {
        GeneratedOutput {
            filename: filename.to_string(),
            content: content.to_string(),
            avatar_ref: None,
            kind,
        }
    }

    fn read_entries(bytes: Vec<u8>) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entries = Vec::new();
        for idx in 0..archive.len() {
            let mut entry = archive.by_index(idx).unwrap();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            entries.push((entry.name().to_string(), content));
        }
        entries
    }

    #[test]
    fn entries_match_outputs_verbatim() {
        let outputs = vec![
            output("stats_steve.mcfunction", "line one\nline two\n", OutputKind::Player),
            output("update_all_stats.mcfunction", "", OutputKind::Aggregate),
        ];
        let entries = read_entries(build_archive(&outputs).unwrap());
        assert_eq!(
            entries,
            vec![
                (
                    "stats_steve.mcfunction".to_string(),
                    "line one\nline two\n".to_string()
                ),
                ("update_all_stats.mcfunction".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn identical_outputs_give_identical_bytes() {
        let outputs = vec![output("a.mcfunction", "say hi\n", OutputKind::Player)];
        assert_eq!(
            build_archive(&outputs).unwrap(),
            build_archive(&outputs).unwrap()
        );
    }

    #[test]
    fn duplicate_filenames_keep_last_content() {
        let outputs = vec![
            output("stats_steve.mcfunction", "old\n", OutputKind::Player),
            output("stats_alex.mcfunction", "alex\n", OutputKind::Player),
            output("stats_steve.mcfunction", "new\n", OutputKind::Player),
        ];
        let entries = read_entries(build_archive(&outputs).unwrap());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("stats_steve.mcfunction".into(), "new\n".into()));
    }

    #[test]
    fn empty_output_list_is_a_valid_archive() {
        let entries = read_entries(build_archive(&[]).unwrap());
        assert!(entries.is_empty());
    }

    #[test]
    fn write_archive_creates_parent_directories() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("out").join("stats.zip");
        let size = write_archive(
            &path,
            &[output("a.mcfunction", "say hi\n", OutputKind::Player)],
        )
        .unwrap();
        assert_eq!(fs::metadata(&path).unwrap().len(), size);
    }
}
