use crate::constants::generator::SET_COMMAND;
use crate::data::ConversionResult;

/// Aggregate counts for one conversion run.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionSummary {
    /// Submitted inputs.
    pub inputs: usize,
    /// Inputs that produced a player script.
    pub converted: usize,
    /// Inputs recorded in `failed_identifiers`.
    pub failed: usize,
    /// Scoreboard writes across all per-player scripts.
    pub scoreboard_writes: usize,
    /// `converted / inputs`, or 0.0 for an empty run.
    pub success_ratio: f64,
}

/// Compute run totals from a conversion result.
pub fn summarize(result: &ConversionResult) -> ConversionSummary {
    let converted = result.player_outputs().count();
    let failed = result.failed_identifiers.len();
    let inputs = converted + failed;
    let scoreboard_writes = result
        .player_outputs()
        .flat_map(|output| output.content.lines())
        .filter(|line| line.starts_with(SET_COMMAND))
        .count();
    let success_ratio = if inputs == 0 {
        0.0
    } else {
        converted as f64 / inputs as f64
    };
    ConversionSummary {
        inputs,
        converted,
        failed,
        scoreboard_writes,
        success_ratio,
    }
}
