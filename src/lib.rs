#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Reusable CLI runners behind the crate binaries.
pub mod apps;
/// Zip packaging of generated scripts.
pub mod archive;
/// Conversion configuration types.
pub mod config;
/// Centralized constants used across the pipeline, directory, and transports.
pub mod constants;
/// Input, identity, and output data types.
pub mod data;
/// Player directory traits and built-in backends.
pub mod directory;
/// Restore-script text generation.
pub mod generator;
/// Stat-key to scoreboard mapping loader.
pub mod mapping;
/// Run summary helpers.
pub mod metrics;
/// Batch conversion pipeline.
pub mod pipeline;
/// Static reference payload passthrough.
pub mod reference;
/// Input transports (filesystem and HTTP).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{Addressing, AggregateConfig, ConvertConfig, MalformedInputPolicy};
pub use data::{
    ConversionResult, GeneratedOutput, InputRecord, OutputKind, ResolvedIdentity, StatsDocument,
};
pub use directory::{InMemoryDirectory, PlayerDbDirectory, PlayerDirectory, resolve};
pub use errors::ConvertError;
pub use generator::ContentGenerator;
pub use mapping::{MappingLocation, MappingTable, load_mapping};
pub use pipeline::StatsConverter;
pub use types::{
    AvatarRef, DisplayName, Identifier, OutputFilename, ScoreboardName, SourceId, StatKey,
};
