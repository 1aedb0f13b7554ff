use std::error::Error;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::archive::write_archive;
use crate::config::{AggregateConfig, Addressing, ConvertConfig, MalformedInputPolicy};
use crate::constants::aggregate::{AGGREGATE_FILENAME, DEFAULT_FUNCTION_PREFIX};
use crate::constants::archive::DEFAULT_ARCHIVE_NAME;
use crate::constants::directory::{PLAYERDB_ENDPOINT, PLAYERDB_ENDPOINT_ENV_VAR};
use crate::constants::generator::DEFAULT_BROADCAST_TARGET;
use crate::constants::mapping::{DEFAULT_MAPPING_PATH, MAPPING_ENV_VAR};
use crate::constants::reference::{DEFAULT_REFERENCE_FILENAME, REFERENCE_URL};
use crate::data::ConversionResult;
use crate::directory::PlayerDbDirectory;
use crate::mapping::MappingLocation;
use crate::metrics::summarize;
use crate::pipeline::StatsConverter;
use crate::reference::download_reference;
use crate::transport::fs::collect_input_records;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AddressingArg {
    #[value(name = "self")]
    SelfTargeted,
    Named,
}

#[derive(Debug, Parser)]
#[command(
    name = "convert_stats",
    disable_help_subcommand = true,
    about = "Convert Minecraft statistics exports into scoreboard restore scripts",
    long_about = "Resolve each <uuid>.json statistics export to a player name, translate mapped stats into scoreboard commands, and package one mcfunction per player (plus an aggregate script) into a zip archive.",
    after_help = "The mapping location is resolved in order by --mapping, the CUBOSTATS_MAPPING environment variable, then ./cubostats_mapping.txt."
)]
/// CLI for `convert_stats`.
///
/// Common usage:
/// - Convert a stats folder: `convert_stats world/stats`
/// - Use a remote mapping: `--mapping https://host/cubostats_mapping.txt`
/// - Macro-style scripts for another executor: `--addressing named`
struct ConvertStatsCli {
    #[arg(
        value_name = "PATH",
        required = true,
        help = "Statistics export files or directories containing <uuid>.json files"
    )]
    inputs: Vec<PathBuf>,
    #[arg(
        long,
        value_name = "PATH_OR_URL",
        env = MAPPING_ENV_VAR,
        default_value = DEFAULT_MAPPING_PATH,
        help = "Mapping resource (local path or http(s) URL)"
    )]
    mapping: String,
    #[arg(
        long,
        short,
        value_name = "ZIP",
        default_value = DEFAULT_ARCHIVE_NAME,
        help = "Archive output path"
    )]
    output: PathBuf,
    #[arg(
        long,
        value_enum,
        default_value = "self",
        help = "Address commands to the executing entity or to each player by name"
    )]
    addressing: AddressingArg,
    #[arg(
        long = "broadcast-target",
        default_value = DEFAULT_BROADCAST_TARGET,
        help = "Header broadcast target for named addressing"
    )]
    broadcast_target: String,
    #[arg(long = "no-aggregate", help = "Skip the aggregate restore script")]
    no_aggregate: bool,
    #[arg(
        long = "aggregate-filename",
        default_value = AGGREGATE_FILENAME,
        conflicts_with = "no_aggregate",
        help = "Archive filename of the aggregate restore script"
    )]
    aggregate_filename: String,
    #[arg(
        long = "function-prefix",
        default_value = DEFAULT_FUNCTION_PREFIX,
        help = "Function path prefix used by aggregate script lines"
    )]
    function_prefix: String,
    #[arg(
        long = "abort-on-malformed",
        help = "Fail the whole run when an input is not valid JSON"
    )]
    abort_on_malformed: bool,
    #[arg(
        long = "parallel-lookups",
        help = "Resolve player names concurrently (output order is unchanged)"
    )]
    parallel_lookups: bool,
    #[arg(
        long = "directory-endpoint",
        value_name = "URL",
        env = PLAYERDB_ENDPOINT_ENV_VAR,
        default_value = PLAYERDB_ENDPOINT,
        help = "Player directory endpoint; the UUID is appended as a path segment"
    )]
    directory_endpoint: String,
}

#[derive(Debug, Parser)]
#[command(
    name = "fetch_reference",
    disable_help_subcommand = true,
    about = "Download the precomputed retroactive stats update payload",
    long_about = "Fetch the published retroactive_stats_update.json payload and save it unchanged."
)]
struct FetchReferenceCli {
    #[arg(long, default_value = REFERENCE_URL, help = "Payload URL")]
    url: String,
    #[arg(
        long,
        short,
        value_name = "PATH",
        default_value = DEFAULT_REFERENCE_FILENAME,
        help = "Destination file"
    )]
    output: PathBuf,
}

impl ConvertStatsCli {
    fn convert_config(&self) -> ConvertConfig {
        let addressing = match self.addressing {
            AddressingArg::SelfTargeted => Addressing::SelfTargeted,
            AddressingArg::Named => Addressing::Named {
                broadcast_target: self.broadcast_target.clone(),
            },
        };
        let aggregate = (!self.no_aggregate).then(|| AggregateConfig {
            filename: self.aggregate_filename.clone(),
            function_prefix: self.function_prefix.clone(),
        });
        let malformed_input = if self.abort_on_malformed {
            MalformedInputPolicy::Abort
        } else {
            MalformedInputPolicy::Isolate
        };
        ConvertConfig::default()
            .with_mapping(MappingLocation::from_arg(&self.mapping))
            .with_addressing(addressing)
            .with_aggregate(aggregate)
            .with_malformed_input(malformed_input)
            .with_parallel_lookups(self.parallel_lookups)
    }
}

/// Run the batch conversion CLI with the given arguments (program name excluded).
pub fn run_convert_stats<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();

    let Some(cli) = parse_cli::<ConvertStatsCli, _>(
        std::iter::once("convert_stats".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let inputs = collect_input_records(&cli.inputs)?;
    if inputs.is_empty() {
        println!("No .json statistics files found.");
    }
    let converter = StatsConverter::new(
        cli.convert_config(),
        Box::new(PlayerDbDirectory::with_endpoint(cli.directory_endpoint.clone())),
    );
    let result = converter.run(inputs)?;
    let archive_bytes = write_archive(&cli.output, &result.outputs)?;

    print_report(&result);
    println!(
        "Archive written to {} ({} bytes)",
        cli.output.display(),
        archive_bytes
    );
    Ok(())
}

/// Run the reference payload download CLI with the given arguments (program name excluded).
pub fn run_fetch_reference<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    init_tracing();

    let Some(cli) = parse_cli::<FetchReferenceCli, _>(
        std::iter::once("fetch_reference".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let written = download_reference(&cli.url, &cli.output)?;
    println!("Saved {} ({} bytes)", cli.output.display(), written);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn print_report(result: &ConversionResult) {
    let summary = summarize(result);
    println!("Generated files:");
    if summary.converted == 0 {
        println!("  (none)");
    }
    for output in result.player_outputs() {
        match &output.avatar_ref {
            Some(avatar) => println!("  {}  [{}]", output.filename, avatar),
            None => println!("  {}", output.filename),
        }
    }
    if let Some(aggregate) = result.aggregate() {
        println!("Aggregate script: {}", aggregate.filename);
    }
    if !result.failed_identifiers.is_empty() {
        println!("Failed inputs:");
        for identifier in &result.failed_identifiers {
            println!("  {identifier}");
        }
    }
    println!(
        "Converted {}/{} input(s) ({:.0}%), {} scoreboard write(s)",
        summary.converted,
        summary.inputs,
        summary.success_ratio * 100.0,
        summary.scoreboard_writes
    );
}

/// Parse runner arguments without exiting the process.
///
/// `--help` and `--version` print their text and yield `Ok(None)` so the
/// runner returns cleanly; every other clap error is handed back to the caller.
fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<OsString> + Clone,
{
    let err = match T::try_parse_from(args) {
        Ok(cli) => return Ok(Some(cli)),
        Err(err) => err,
    };
    if matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    ) {
        err.print()?;
        return Ok(None);
    }
    Err(err.into())
}
