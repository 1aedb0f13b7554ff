use std::path::PathBuf;

use crate::constants::aggregate::{AGGREGATE_FILENAME, DEFAULT_FUNCTION_PREFIX};
use crate::constants::generator::DEFAULT_BROADCAST_TARGET;
use crate::constants::mapping::DEFAULT_MAPPING_PATH;
use crate::mapping::MappingLocation;

/// Who generated commands address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Addressing {
    /// Scripts run as the affected player: header and writes target `@s`.
    #[default]
    SelfTargeted,
    /// Scripts run on behalf of another entity: writes target the player by
    /// name and the header broadcasts to `broadcast_target`.
    Named {
        /// Target selector or macro placeholder for the header broadcast.
        broadcast_target: String,
    },
}

impl Addressing {
    /// Named addressing with the default macro broadcast target.
    pub fn named() -> Self {
        Self::Named {
            broadcast_target: DEFAULT_BROADCAST_TARGET.to_string(),
        }
    }
}

/// What happens when an input is not a parseable statistics document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedInputPolicy {
    /// Record the input as failed and continue the batch.
    #[default]
    Isolate,
    /// Fail the whole run with `MalformedInput`.
    Abort,
}

/// Settings for the aggregate restore script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Reserved archive filename of the aggregate script.
    pub filename: String,
    /// Function path prefix that per-player scripts are installed under.
    pub function_prefix: String,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            filename: AGGREGATE_FILENAME.to_string(),
            function_prefix: DEFAULT_FUNCTION_PREFIX.to_string(),
        }
    }
}

/// Top-level conversion configuration.
#[derive(Clone, Debug)]
pub struct ConvertConfig {
    /// Where the mapping resource is loaded from on every run.
    pub mapping: MappingLocation,
    /// Command addressing style, fixed for the whole run.
    pub addressing: Addressing,
    /// Aggregate script settings; `None` disables the aggregate output.
    pub aggregate: Option<AggregateConfig>,
    /// Handling of unparseable inputs.
    pub malformed_input: MalformedInputPolicy,
    /// Resolve identities in parallel (output order is unchanged).
    pub parallel_lookups: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            mapping: MappingLocation::File(PathBuf::from(DEFAULT_MAPPING_PATH)),
            addressing: Addressing::default(),
            aggregate: Some(AggregateConfig::default()),
            malformed_input: MalformedInputPolicy::default(),
            parallel_lookups: false,
        }
    }
}

impl ConvertConfig {
    /// Read the mapping from `mapping`.
    pub fn with_mapping(mut self, mapping: MappingLocation) -> Self {
        self.mapping = mapping;
        self
    }

    /// Address generated commands as `addressing` describes.
    pub fn with_addressing(mut self, addressing: Addressing) -> Self {
        self.addressing = addressing;
        self
    }

    /// Enable the aggregate script with the given settings, or disable it with `None`.
    pub fn with_aggregate(mut self, aggregate: Option<AggregateConfig>) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Choose how unparseable inputs are handled.
    pub fn with_malformed_input(mut self, policy: MalformedInputPolicy) -> Self {
        self.malformed_input = policy;
        self
    }

    /// Resolve identities concurrently; output order is unchanged.
    pub fn with_parallel_lookups(mut self, parallel_lookups: bool) -> Self {
        self.parallel_lookups = parallel_lookups;
        self
    }
}
