/// Per-input identifier, normally the UUID file stem of a statistics export.
/// Example: `069a79f4-44e9-4726-a5be-fca90e38aaf5`
pub type Identifier = String;
/// Identifier for a mapping, directory, or reference source used in errors and logs.
/// Examples: `mapping`, `playerdb`, `reference`
pub type SourceId = String;
/// Scoreboard objective name written by generated commands.
/// Example: `cubostat.deaths`
pub type ScoreboardName = String;
/// Normalized stat key in `<category>:<stat>` form.
/// Example: `minecraft.custom:minecraft.deaths`
pub type StatKey = String;
/// Canonical player name returned by the directory.
/// Example: `Notch`
pub type DisplayName = String;
/// Avatar image reference returned by the directory.
/// Example: `https://crafthead.net/avatar/069a79f444e94726a5befca90e38aaf5`
pub type AvatarRef = String;
/// Archive entry filename for a generated script.
/// Example: `stats_notch.mcfunction`
pub type OutputFilename = String;
