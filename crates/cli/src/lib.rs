//! cmdmatch CLI Library
//!
//! This crate provides `cm`, a command-line front end for `cmdmatch-core`. It
//! loads command definitions from a YAML file, matches the tokens it is given
//! against them, and prints the result.
//!
//! # Architecture
//!
//! - [`cli_args`]: Command-line argument parsing and dispatcher construction
//! - [`output`]: Command listings and YAML rendering of parse results
//!
//! # Examples
//!
//! ```bash
//! # Match tokens against the default definitions file
//! cm build --target release -verbose
//!
//! # Use another definitions file
//! cm -c ./commands.yml copy -fast notes.txt
//!
//! # Names without prefixes
//! cm --free run input.txt
//!
//! # List defined commands
//! cm --list
//! ```

pub mod cli_args;
pub mod output;
