use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

use crate::archive::build_archive;
use crate::constants::transport::INPUT_EXTENSION;
use crate::errors::ConvertError;

pub use crate::types::{AvatarRef, DisplayName, Identifier, OutputFilename};

/// Per-category stat values keyed by stat name, in document order.
pub type CategoryStats = IndexMap<String, Number>;
/// All categories of a statistics document, in document order.
pub type StatCategories = IndexMap<String, CategoryStats>;

/// One submitted statistics export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputRecord {
    /// Lookup key for the player directory (UUID form expected).
    pub identifier: Identifier,
    /// Raw file contents.
    pub raw_text: String,
}

impl InputRecord {
    /// Create a record from an explicit identifier.
    pub fn new(identifier: impl Into<Identifier>, raw_text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Create a record whose identifier is the filename minus a trailing `.json`.
    pub fn from_filename(filename: &str, raw_text: impl Into<String>) -> Self {
        Self::new(identifier_from_filename(filename), raw_text)
    }
}

/// Derive an identifier from an export filename (`<uuid>.json` → `<uuid>`).
///
/// The extension is matched case-insensitively, so `<uuid>.JSON` yields `<uuid>` too.
pub fn identifier_from_filename(filename: &str) -> Identifier {
    let Some((stem, extension)) = filename.rsplit_once('.') else {
        return filename.to_string();
    };
    if extension.eq_ignore_ascii_case(INPUT_EXTENSION) {
        stem.to_string()
    } else {
        filename.to_string()
    }
}

/// Parsed statistics export.
///
/// Only `stats` is read; other top-level keys such as `DataVersion` are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StatsDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    /// Categories of stat values.
    pub stats: StatCategories,
}

impl StatsDocument {
    /// Parse the raw text of an input record.
    pub fn parse(identifier: &str, raw_text: &str) -> Result<Self, ConvertError> {
        serde_json::from_str(raw_text).map_err(|err| ConvertError::MalformedInput {
            identifier: identifier.to_string(),
            reason: err.to_string(),
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<StatCategories, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StatCategories>::deserialize(deserializer)?.unwrap_or_default())
}

/// Directory answer for one identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Player name used for filenames and named addressing.
    pub display_name: DisplayName,
    /// Avatar image reference, when the directory provides one.
    pub avatar_ref: Option<AvatarRef>,
}

impl ResolvedIdentity {
    /// Identity without an avatar.
    pub fn new(display_name: impl Into<DisplayName>) -> Self {
        Self {
            display_name: display_name.into(),
            avatar_ref: None,
        }
    }

    /// Attach an avatar reference.
    pub fn with_avatar(mut self, avatar_ref: impl Into<AvatarRef>) -> Self {
        self.avatar_ref = Some(avatar_ref.into());
        self
    }
}

/// Distinguishes per-player scripts from the synthetic aggregate script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    /// Script for one resolved player.
    Player,
    /// Script that re-applies every player script.
    Aggregate,
}

/// One generated script destined for the archive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Archive entry name.
    pub filename: OutputFilename,
    /// Script text, stored verbatim.
    pub content: String,
    /// Avatar of the player this script restores.
    pub avatar_ref: Option<AvatarRef>,
    /// Player script or aggregate.
    pub kind: OutputKind,
}

/// Outcome of one pipeline invocation.
///
/// Every submitted identifier is represented exactly once: either by a
/// `Player` output or by an entry in `failed_identifiers` (submission order).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionResult {
    /// Player scripts in submission order, then the aggregate if enabled.
    pub outputs: Vec<GeneratedOutput>,
    /// Identifiers that failed parsing, validation, or resolution.
    pub failed_identifiers: Vec<Identifier>,
}

impl ConversionResult {
    /// Per-player outputs, excluding the aggregate script.
    pub fn player_outputs(&self) -> impl Iterator<Item = &GeneratedOutput> {
        self.outputs
            .iter()
            .filter(|output| output.kind == OutputKind::Player)
    }

    /// The aggregate script, when aggregate mode produced one.
    pub fn aggregate(&self) -> Option<&GeneratedOutput> {
        self.outputs
            .iter()
            .find(|output| output.kind == OutputKind::Aggregate)
    }

    /// Package every output (aggregate included) into a zip archive.
    pub fn archive(&self) -> Result<Vec<u8>, ConvertError> {
        build_archive(&self.outputs)
    }
}
