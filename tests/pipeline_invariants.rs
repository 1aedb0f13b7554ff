use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::sync::Arc;

use cubostats::metrics::summarize;
use cubostats::{
    ConvertConfig, ConvertError, InMemoryDirectory, InputRecord, MalformedInputPolicy,
    MappingLocation, MappingTable, OutputKind, ResolvedIdentity, StatsConverter,
};
use zip::ZipArchive;

const MAPPING: &str = "\
cubostat.deaths minecraft.custom:minecraft.deaths
cubostat.jumps minecraft.custom:minecraft.jump
cubostat.stone_mined minecraft.mined:minecraft.stone

malformed-line
";

fn uuid(n: u32) -> String {
    format!("{n:08x}-0000-4000-8000-000000000000")
}

fn stats_doc(deaths: u64, jumps: u64) -> String {
    format!(
        r#"{{"stats":{{"minecraft:custom":{{"minecraft:deaths":{deaths},"minecraft:jump":{jumps},"minecraft:walk_one_cm":100}}}},"DataVersion":3953}}"#
    )
}

fn build_directory(known: &[(String, &str)]) -> Arc<InMemoryDirectory> {
    let mut directory = InMemoryDirectory::new();
    for (identifier, name) in known {
        directory = directory.with_player(identifier.clone(), ResolvedIdentity::new(*name));
    }
    Arc::new(directory)
}

fn converter(config: ConvertConfig, directory: &Arc<InMemoryDirectory>) -> StatsConverter {
    StatsConverter::new(
        config.with_mapping(MappingLocation::Inline(MAPPING.to_string())),
        Box::new(Arc::clone(directory)),
    )
}

fn archive_entry_names(bytes: Vec<u8>) -> HashSet<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|idx| archive.by_index(idx).unwrap().name().to_string())
        .collect()
}

#[test]
fn every_input_is_accounted_for_exactly_once() {
    let known: Vec<(String, &str)> = vec![(uuid(1), "Steve"), (uuid(2), "Alex"), (uuid(4), "Notch")];
    let directory = build_directory(&known);
    let inputs = vec![
        InputRecord::new(uuid(1), stats_doc(3, 10)),
        InputRecord::new("short-id", stats_doc(1, 1)),
        InputRecord::new(uuid(2), stats_doc(0, 0)),
        InputRecord::new(uuid(3), stats_doc(9, 9)),
        InputRecord::new(uuid(4), "not json at all"),
        InputRecord::new(
            uuid(5),
            r#"{"stats":{"minecraft:custom":{"minecraft:deaths":"many"}}}"#,
        ),
    ];
    let total = inputs.len();

    let result = converter(ConvertConfig::default(), &directory)
        .run(inputs)
        .unwrap();

    assert_eq!(
        result.player_outputs().count() + result.failed_identifiers.len(),
        total
    );
    assert_eq!(
        result.failed_identifiers,
        vec!["short-id".to_string(), uuid(3), uuid(4), uuid(5)]
    );
    // uuid(1), uuid(2) and the unknown uuid(3) are looked up; the rest never are.
    assert_eq!(directory.lookup_count(), 3);

    let summary = summarize(&result);
    assert_eq!(summary.inputs, total);
    assert_eq!(summary.converted, 2);
    assert_eq!(summary.scoreboard_writes, 4);
}

#[test]
fn archive_entries_equal_output_filenames() {
    let directory = build_directory(&[(uuid(1), "Steve"), (uuid(2), "Alex")]);
    let result = converter(ConvertConfig::default(), &directory)
        .run(vec![
            InputRecord::new(uuid(1), stats_doc(3, 10)),
            InputRecord::new(uuid(2), stats_doc(5, 0)),
            InputRecord::new(uuid(9), stats_doc(5, 0)),
        ])
        .unwrap();

    let expected: HashSet<String> = result
        .outputs
        .iter()
        .map(|output| output.filename.clone())
        .collect();
    assert_eq!(archive_entry_names(result.archive().unwrap()), expected);
    assert!(expected.contains("update_all_stats.mcfunction"));
    assert_eq!(
        result
            .outputs
            .iter()
            .filter(|output| output.kind == OutputKind::Aggregate)
            .count(),
        1
    );
}

#[test]
fn archive_content_is_verbatim() {
    let directory = build_directory(&[(uuid(1), "Steve")]);
    let result = converter(ConvertConfig::default().with_aggregate(None), &directory)
        .run(vec![InputRecord::new(uuid(1), stats_doc(7, 2))])
        .unwrap();

    let mut archive = ZipArchive::new(Cursor::new(result.archive().unwrap())).unwrap();
    let mut content = String::new();
    archive
        .by_name("stats_steve.mcfunction")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, result.outputs[0].content);
    assert!(content.contains("scoreboard players set @s cubostat.deaths 7\n"));
    assert!(content.contains("scoreboard players set @s cubostat.jumps 2\n"));
    assert!(!content.contains("walk_one_cm"));
}

#[test]
fn emitted_scoreboards_come_from_the_mapping() {
    let mapping = MappingTable::parse(MAPPING);
    let scoreboards: HashSet<&str> = mapping.iter().map(|(_, scoreboard)| scoreboard).collect();
    let directory = build_directory(&[(uuid(1), "Steve")]);
    let result = converter(ConvertConfig::default(), &directory)
        .run_with_mapping(
            &mapping,
            vec![InputRecord::new(
                uuid(1),
                r#"{"stats":{"minecraft:mined":{"minecraft:stone":64,"minecraft:dirt":3},"minecraft:custom":{"minecraft:deaths":1}}}"#,
            )],
        )
        .unwrap();

    let mut writes = 0;
    for line in result.outputs[0].content.lines() {
        if let Some(rest) = line.strip_prefix("scoreboard players set @s ") {
            let scoreboard = rest.split_whitespace().next().unwrap();
            assert!(
                scoreboards.contains(scoreboard),
                "unexpected scoreboard {scoreboard}"
            );
            writes += 1;
        }
    }
    assert_eq!(writes, 2);
}

#[test]
fn abort_policy_surfaces_malformed_input() {
    let directory = build_directory(&[(uuid(1), "Steve")]);
    let err = converter(
        ConvertConfig::default().with_malformed_input(MalformedInputPolicy::Abort),
        &directory,
    )
    .run(vec![
        InputRecord::new(uuid(1), stats_doc(1, 1)),
        InputRecord::new(uuid(2), "{"),
    ])
    .unwrap_err();
    assert!(matches!(err, ConvertError::MalformedInput { .. }));
}

#[test]
fn repeated_runs_are_identical() {
    let directory = build_directory(&[(uuid(1), "Steve"), (uuid(2), "Alex")]);
    let converter = converter(ConvertConfig::default(), &directory);
    let inputs = vec![
        InputRecord::new(uuid(2), stats_doc(2, 2)),
        InputRecord::new(uuid(1), stats_doc(1, 1)),
    ];
    let first = converter.run(inputs.clone()).unwrap();
    let second = converter.run(inputs).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.archive().unwrap(), second.archive().unwrap());
}
