//! Configuration path utilities for cmdmatch.
//!
//! This module resolves where command definitions are read from and expands
//! shell variables like `~` in those paths.

use crate::error::Result;
use crate::matcher::{Indicators, Matcher, Mode};

/// Default path for the command definitions file
const DEFAULT_DEFINITIONS_PATH: &str = "~/.cmdmatch/commands.yml";

/// Resolves the command definitions file path.
///
/// If a custom path is provided, uses that path. Otherwise, uses the default
/// definitions path. Shell expansions like `~` are resolved.
///
/// # Arguments
///
/// * `definitions_path_arg` - Optional custom definitions file path
///
/// # Returns
///
/// The resolved path to the definitions file
///
/// # Examples
///
/// ```
/// use cmdmatch_core::config::get_definitions_path;
///
/// // Use default path
/// let default_path = get_definitions_path(&None);
///
/// // Use custom path
/// let custom_path = get_definitions_path(&Some("/path/to/commands.yml".to_string()));
/// assert_eq!(custom_path, "/path/to/commands.yml");
/// ```
pub fn get_definitions_path(definitions_path_arg: &Option<String>) -> String {
    let definitions_path = match definitions_path_arg {
        Some(definitions_path) => definitions_path,
        None => DEFAULT_DEFINITIONS_PATH,
    };

    shellexpand::tilde(definitions_path).to_string()
}

/// Builds a matcher from optional indicator overrides.
///
/// Missing indicators fall back to `-` for flags and `--` for keys.
///
/// # Errors
///
/// Returns [`crate::error::Error::IdenticalIndicators`] if the resulting
/// flag and key indicators are equal.
///
/// # Examples
///
/// ```
/// use cmdmatch_core::config::build_matcher;
///
/// let matcher = build_matcher(Some("/"), None, false)?;
/// assert_eq!(matcher.indicators().flag(), "/");
/// assert_eq!(matcher.indicators().key(), "--");
///
/// assert!(build_matcher(Some("--"), None, false).is_err());
/// # Ok::<(), cmdmatch_core::error::Error>(())
/// ```
pub fn build_matcher(flag: Option<&str>, key: Option<&str>, free: bool) -> Result<Matcher> {
    let defaults = Indicators::default();
    let indicators = Indicators::new(
        flag.unwrap_or(defaults.flag()),
        key.unwrap_or(defaults.key()),
    )?;

    let mode = if free { Mode::Free } else { Mode::Prefixed };

    Ok(Matcher::new(indicators).with_mode(mode))
}
