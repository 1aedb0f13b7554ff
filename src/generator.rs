//! Script text generation for one player.

use serde_json::Number;

use crate::config::Addressing;
use crate::constants::aggregate::PRESENCE_SELECTOR;
use crate::constants::generator::{
    HEADER_MESSAGE, MACRO_PLACEHOLDER_CLOSE, MACRO_PLACEHOLDER_OPEN, NAMESPACE_REPLACEMENT,
    OUTPUT_EXTENSION, OUTPUT_PREFIX, SELF_SELECTOR, SET_COMMAND, STAT_KEY_SEPARATOR,
};
use crate::data::StatsDocument;
use crate::mapping::MappingTable;
use crate::types::{OutputFilename, StatKey};

/// Builds per-player restore scripts for a fixed addressing style.
#[derive(Clone, Debug, Default)]
pub struct ContentGenerator {
    addressing: Addressing,
}

impl ContentGenerator {
    /// Generator for scripts addressed as `addressing` describes.
    pub fn new(addressing: Addressing) -> Self {
        Self { addressing }
    }

    /// Render the restore script for `display_name`.
    ///
    /// Output is a header broadcast, a blank line, then one scoreboard write
    /// per mapped stat in document order. Unmapped stats are skipped.
    pub fn generate(
        &self,
        doc: &StatsDocument,
        mapping: &MappingTable,
        display_name: &str,
    ) -> String {
        let mut content = self.header_line();
        content.push('\n');
        let subject = match &self.addressing {
            Addressing::SelfTargeted => SELF_SELECTOR,
            Addressing::Named { .. } => display_name,
        };
        for (category, stats) in &doc.stats {
            let category = normalize_segment(category);
            for (stat, value) in stats {
                let Some(scoreboard) = mapping.get(&full_stat_key(&category, stat)) else {
                    continue;
                };
                content.push_str(&format!(
                    "{SET_COMMAND} {subject} {scoreboard} {}\n",
                    render_stat_value(value)
                ));
            }
        }
        content
    }

    /// Aggregate-script line that re-applies one player's script.
    ///
    /// Self-targeted scripts run when the executor is that player. Named scripts
    /// run when the player is online, and every header macro placeholder is
    /// bound to the player's name.
    pub fn aggregate_line(&self, display_name: &str, function_prefix: &str) -> String {
        let function = format!(
            "{function_prefix}{OUTPUT_PREFIX}{}",
            display_name.to_lowercase()
        );
        match &self.addressing {
            Addressing::SelfTargeted => format!(
                "execute if entity {SELF_SELECTOR}[name={display_name}] run function {function}\n"
            ),
            Addressing::Named { broadcast_target } => {
                let placeholders = macro_placeholders(broadcast_target);
                let arguments = if placeholders.is_empty() {
                    String::new()
                } else {
                    let bindings: Vec<String> = placeholders
                        .iter()
                        .map(|name| format!("{name}:\"{display_name}\""))
                        .collect();
                    format!(" {{{}}}", bindings.join(","))
                };
                format!(
                    "execute if entity {PRESENCE_SELECTOR}[name={display_name}] run function {function}{arguments}\n"
                )
            }
        }
    }

    fn header_line(&self) -> String {
        match &self.addressing {
            Addressing::SelfTargeted => format!("tellraw {SELF_SELECTOR} {HEADER_MESSAGE}\n"),
            Addressing::Named { broadcast_target } => {
                let macro_marker = if broadcast_target.contains(MACRO_PLACEHOLDER_OPEN) {
                    "$"
                } else {
                    ""
                };
                format!("{macro_marker}tellraw {broadcast_target} {HEADER_MESSAGE}\n")
            }
        }
    }
}

/// Replace the first namespace separator in a category or stat name.
pub fn normalize_segment(segment: &str) -> String {
    segment.replacen(STAT_KEY_SEPARATOR, &NAMESPACE_REPLACEMENT.to_string(), 1)
}

/// Mapping key for a stat under an already-normalized category.
pub fn full_stat_key(normalized_category: &str, stat: &str) -> StatKey {
    format!(
        "{normalized_category}{STAT_KEY_SEPARATOR}{}",
        normalize_segment(stat)
    )
}

/// Archive filename for a player's script.
pub fn output_filename(display_name: &str) -> OutputFilename {
    format!("{OUTPUT_PREFIX}{}{OUTPUT_EXTENSION}", display_name.to_lowercase())
}

/// Render a stat value as scoreboard integer text where the number is integral.
///
/// Integer literals keep their source digits; integral floats such as `7.0` or
/// `1e3` print without a fraction. Anything else keeps its source text.
pub fn render_stat_value(value: &Number) -> String {
    let text = value.to_string();
    let digits = text.strip_prefix('-').unwrap_or(&text);
    if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return text;
    }
    match value.as_f64() {
        Some(float) if float.is_finite() && float.fract() == 0.0 => format!("{float}"),
        _ => text,
    }
}

/// Macro placeholder names in `template`, first occurrence order, deduplicated.
fn macro_placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find(MACRO_PLACEHOLDER_OPEN) {
        let after = &rest[start + MACRO_PLACEHOLDER_OPEN.len()..];
        let Some(end) = after.find(MACRO_PLACEHOLDER_CLOSE) else {
            break;
        };
        let name = &after[..end];
        if !name.is_empty() && !names.contains(&name) {
            names.push(name);
        }
        rest = &after[end + 1..];
    }
    names
}
