//! Text produced by the `cm` binary.

use cmdmatch_core::error::{Error, Result};
use cmdmatch_core::model::Command;
use cmdmatch_core::parsed::ParsedCommandData;
use itertools::Itertools;

/// One line per command, grouped by category and sorted by name within a
/// category. Commands without a category come last.
#[must_use]
pub fn list_commands(commands: &[Command]) -> Vec<String> {
    commands
        .iter()
        .sorted_by_key(|&command| {
            (
                command.get_category().is_none(),
                command.get_category(),
                command.name(),
            )
        })
        .map(|command| match command.get_category() {
            Some(category) => format!("[{category}] {command}"),
            None => command.to_string(),
        })
        .collect()
}

/// Renders a parse result as YAML.
///
/// # Errors
///
/// Returns an error if the result cannot be serialized.
pub fn render_parsed(parsed: &ParsedCommandData) -> Result<String> {
    serde_yaml::to_string(parsed).map_err(|e| {
        Error::yaml_error(
            "writing".to_string(),
            "parsed result".to_string(),
            "stdout".to_string(),
            e,
        )
    })
}
