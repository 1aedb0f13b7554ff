//! Batch conversion of statistics exports into restore scripts.
//!
//! A run walks its inputs in submission order: parse, validate, resolve,
//! generate. Per-item failures are collected instead of aborting the batch,
//! so every submitted identifier ends up either as a player output or in
//! `failed_identifiers`.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::{ConvertConfig, MalformedInputPolicy};
use crate::data::{
    ConversionResult, GeneratedOutput, InputRecord, OutputKind, ResolvedIdentity, StatsDocument,
};
use crate::directory::{PlayerDirectory, resolve};
use crate::errors::ConvertError;
use crate::generator::{ContentGenerator, output_filename};
use crate::mapping::{MappingTable, load_mapping};
use crate::types::Identifier;

/// Input that parsed successfully and is waiting on identity resolution.
struct ParsedInput {
    identifier: Identifier,
    document: StatsDocument,
}

/// Per-input state after the parse step, kept in submission order.
enum Stage {
    Parsed(ParsedInput),
    Failed(Identifier),
}

/// Per-input state after resolution, kept in submission order.
enum Outcome {
    Resolved(ParsedInput, ResolvedIdentity),
    Failed(Identifier),
}

/// Drives mapping load, resolution, generation, and aggregation for a batch.
pub struct StatsConverter {
    config: ConvertConfig,
    directory: Box<dyn PlayerDirectory>,
    generator: ContentGenerator,
}

impl StatsConverter {
    /// Create a converter that resolves identities through `directory`.
    pub fn new(config: ConvertConfig, directory: Box<dyn PlayerDirectory>) -> Self {
        let generator = ContentGenerator::new(config.addressing.clone());
        Self {
            config,
            directory,
            generator,
        }
    }

    /// Load the mapping from the configured location and convert `inputs`.
    ///
    /// The mapping is reloaded on every call. A mapping that cannot be read
    /// fails the run with `SourceUnavailable` before any input is touched.
    pub fn run(&self, inputs: Vec<InputRecord>) -> Result<ConversionResult, ConvertError> {
        let mapping = load_mapping(&self.config.mapping)?;
        self.run_with_mapping(&mapping, inputs)
    }

    /// Convert `inputs` against an already-loaded mapping.
    ///
    /// Only `MalformedInput` under `MalformedInputPolicy::Abort` fails the run;
    /// every other failure is recorded in `failed_identifiers`.
    pub fn run_with_mapping(
        &self,
        mapping: &MappingTable,
        inputs: Vec<InputRecord>,
    ) -> Result<ConversionResult, ConvertError> {
        let started = Instant::now();
        let total = inputs.len();
        info!(
            "[cubostats:pipeline] converting {} input(s) via {}",
            total,
            self.directory.id()
        );

        let stages = self.parse_inputs(inputs)?;
        let outcomes = self.resolve_all(stages);

        let mut outputs = Vec::new();
        let mut failed_identifiers = Vec::new();
        let mut aggregate_body = String::new();
        for outcome in outcomes {
            let (parsed, identity) = match outcome {
                Outcome::Resolved(parsed, identity) => (parsed, identity),
                Outcome::Failed(identifier) => {
                    failed_identifiers.push(identifier);
                    continue;
                }
            };
            if let Some(aggregate) = &self.config.aggregate {
                aggregate_body.push_str(
                    &self
                        .generator
                        .aggregate_line(&identity.display_name, &aggregate.function_prefix),
                );
            }
            outputs.push(GeneratedOutput {
                filename: output_filename(&identity.display_name),
                content: self
                    .generator
                    .generate(&parsed.document, mapping, &identity.display_name),
                avatar_ref: identity.avatar_ref,
                kind: OutputKind::Player,
            });
        }

        if let Some(aggregate) = &self.config.aggregate {
            outputs.push(GeneratedOutput {
                filename: aggregate.filename.clone(),
                content: aggregate_body,
                avatar_ref: None,
                kind: OutputKind::Aggregate,
            });
        }

        info!(
            "[cubostats:pipeline] done inputs={} converted={} failed={} elapsed={:.2}s",
            total,
            total - failed_identifiers.len(),
            failed_identifiers.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(ConversionResult {
            outputs,
            failed_identifiers,
        })
    }

    fn parse_inputs(&self, inputs: Vec<InputRecord>) -> Result<Vec<Stage>, ConvertError> {
        let mut stages = Vec::with_capacity(inputs.len());
        for input in inputs {
            match StatsDocument::parse(&input.identifier, &input.raw_text) {
                Ok(document) => stages.push(Stage::Parsed(ParsedInput {
                    identifier: input.identifier,
                    document,
                })),
                Err(err) => match self.config.malformed_input {
                    MalformedInputPolicy::Abort => return Err(err),
                    MalformedInputPolicy::Isolate => {
                        warn!("[cubostats:pipeline] {err}");
                        stages.push(Stage::Failed(input.identifier));
                    }
                },
            }
        }
        Ok(stages)
    }

    /// Resolve every parsed stage, at most one lookup each, preserving order.
    fn resolve_all(&self, stages: Vec<Stage>) -> Vec<Outcome> {
        let directory = self.directory.as_ref();
        let resolve_stage = |stage: Stage| match stage {
            Stage::Parsed(parsed) => match resolve(directory, &parsed.identifier) {
                Ok(identity) => Outcome::Resolved(parsed, identity),
                Err(err) => {
                    warn!("[cubostats:pipeline] {err}");
                    Outcome::Failed(parsed.identifier)
                }
            },
            Stage::Failed(identifier) => Outcome::Failed(identifier),
        };
        if self.config.parallel_lookups {
            stages.into_par_iter().map(resolve_stage).collect()
        } else {
            stages.into_iter().map(resolve_stage).collect()
        }
    }
}
