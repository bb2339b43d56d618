//! Command-line argument parsing and validation.
//!
//! This module defines the command-line interface structure using the `clap`
//! crate and turns it into the matcher the core library dispatches with.

use clap::Parser;
use cmdmatch_core::config;
use cmdmatch_core::dispatcher::Dispatcher;
use cmdmatch_core::error::Result;

/// Command-line arguments for the `cm` binary.
///
/// Everything after the options is the token sequence to match: the first
/// token names the command, the rest are its parameters.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use cmdmatch_cli::cli_args::Args;
///
/// let args = Args::parse_from(["cm", "-c", "commands.yml", "build", "--target", "release"]);
/// assert_eq!(args.tokens, vec!["build", "--target", "release"]);
/// ```
#[derive(Parser, Debug)] // requires `derive` feature
#[command(term_width = 0)] // Just to make testing across clap features easier
pub struct Args {
    /// Path to the command definitions YAML.
    ///
    /// If not provided, defaults to `~/.cmdmatch/commands.yml`.
    #[arg(long, short = 'c')]
    pub config_path: Option<String>,

    /// Match flag and key names without indicator prefixes.
    #[arg(long, action)]
    pub free: bool,

    /// Prefix marking a flag. Defaults to `-`.
    #[arg(long, allow_hyphen_values = true)]
    pub flag_indicator: Option<String>,

    /// Prefix marking a key. Defaults to `--`.
    #[arg(long, allow_hyphen_values = true)]
    pub key_indicator: Option<String>,

    /// List the defined commands instead of matching tokens.
    #[arg(long, short = 'l', action)]
    pub list: bool,

    /// The tokens to match, starting with the command name.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tokens: Vec<String>,
}

impl Args {
    /// Builds a dispatcher over [`Args::tokens`] using the configured
    /// indicators and mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag and key indicators are identical.
    pub fn dispatcher(&self) -> Result<Dispatcher> {
        let matcher = config::build_matcher(
            self.flag_indicator.as_deref(),
            self.key_indicator.as_deref(),
            self.free,
        )?;

        Ok(Dispatcher::with_source(self.tokens.iter().cloned()).with_matcher(matcher))
    }
}
