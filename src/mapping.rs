//! Stat-key to scoreboard mapping.
//!
//! The backing resource is plain text, one `<scoreboardName> <statKey>` pair
//! per line. The table is built once per run and never mutated afterwards.

use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::info;

use crate::constants::mapping::MAPPING_SOURCE_ID;
use crate::errors::ConvertError;
use crate::transport::http::{default_agent, fetch_text, is_http_url};
use crate::types::{ScoreboardName, StatKey};

/// Immutable lookup from normalized stat key to scoreboard objective.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: IndexMap<StatKey, ScoreboardName>,
}

impl MappingTable {
    /// Parse mapping text.
    ///
    /// Lines with fewer than two whitespace-separated tokens are skipped.
    /// Tokens past the second are ignored. A later line for the same stat key
    /// replaces the earlier scoreboard name.
    pub fn parse(text: &str) -> Self {
        let mut entries = IndexMap::new();
        for line in text.lines() {
            let mut tokens = line.split_whitespace();
            let (Some(scoreboard), Some(stat_key)) = (tokens.next(), tokens.next()) else {
                continue;
            };
            entries.insert(stat_key.to_string(), scoreboard.to_string());
        }
        Self { entries }
    }

    /// Scoreboard objective for `stat_key`, if mapped.
    pub fn get(&self, stat_key: &str) -> Option<&str> {
        self.entries.get(stat_key).map(String::as_str)
    }

    /// Number of mapped stat keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no line produced an entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(stat_key, scoreboard)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, scoreboard)| (key.as_str(), scoreboard.as_str()))
    }
}

/// Where the mapping resource is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MappingLocation {
    /// Local text file.
    File(PathBuf),
    /// HTTP(S) resource fetched on every load.
    Url(String),
    /// Mapping text supplied directly by the caller.
    Inline(String),
}

impl MappingLocation {
    /// Interpret a CLI/env argument: HTTP(S) URLs are fetched, anything else is a path.
    pub fn from_arg(value: &str) -> Self {
        if is_http_url(value) {
            Self::Url(value.trim().to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }

    fn read_text(&self) -> Result<String, ConvertError> {
        match self {
            Self::File(path) => {
                fs::read_to_string(path).map_err(|err| ConvertError::SourceUnavailable {
                    source_id: MAPPING_SOURCE_ID.to_string(),
                    reason: format!("failed reading '{}': {err}", path.display()),
                })
            }
            Self::Url(url) => fetch_text(&default_agent(), MAPPING_SOURCE_ID, url),
            Self::Inline(text) => Ok(text.clone()),
        }
    }
}

/// Load and parse the mapping resource.
pub fn load_mapping(location: &MappingLocation) -> Result<MappingTable, ConvertError> {
    let text = location.read_text()?;
    let mapping = MappingTable::parse(&text);
    info!(
        "[cubostats:mapping] loaded {} mapping(s) from {}",
        mapping.len(),
        location.describe()
    );
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::http::test_server::spawn_one_shot_http;
    use tempfile::tempdir;

    #[test]
    fn skips_lines_with_fewer_than_two_tokens() {
        let mapping = MappingTable::parse(
            "cubostat.deaths minecraft.custom:minecraft.deaths\n\nlonely\n   \n\tcubostat.jumps\tminecraft.custom:minecraft.jump  \n",
        );
        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.get("minecraft.custom:minecraft.deaths"),
            Some("cubostat.deaths")
        );
        assert_eq!(
            mapping.get("minecraft.custom:minecraft.jump"),
            Some("cubostat.jumps")
        );
        assert_eq!(mapping.get("lonely"), None);
    }

    #[test]
    fn later_duplicate_keys_win() {
        let mapping = MappingTable::parse("first stat:key\nsecond stat:key\n");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("stat:key"), Some("second"));
    }

    #[test]
    fn handles_crlf_line_endings() {
        let mapping = MappingTable::parse("a k:1\r\nb k:2\r\n");
        assert_eq!(mapping.get("k:1"), Some("a"));
        assert_eq!(mapping.get("k:2"), Some("b"));
    }

    #[test]
    fn missing_file_is_source_unavailable() {
        let temp = tempdir().unwrap();
        let location = MappingLocation::File(temp.path().join("absent.txt"));
        let err = load_mapping(&location).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::SourceUnavailable { ref source_id, .. } if source_id == MAPPING_SOURCE_ID
        ));
    }

    #[test]
    fn loads_from_file_and_url() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("mapping.txt");
        fs::write(&path, "cubostat.deaths minecraft.custom:minecraft.deaths\n").unwrap();
        let from_file = load_mapping(&MappingLocation::File(path)).unwrap();
        assert_eq!(from_file.len(), 1);

        let (base, handle) = spawn_one_shot_http(
            "200 OK",
            b"cubostat.deaths minecraft.custom:minecraft.deaths\n".to_vec(),
        );
        let from_url =
            load_mapping(&MappingLocation::from_arg(&format!("{base}/mapping.txt"))).unwrap();
        handle.join().unwrap();
        assert_eq!(from_url, from_file);
    }
}
