//! Command definition loading and validation.
//!
//! This module reads command definitions from YAML files and validates the
//! names of commands, positions, flags and keys before they are used for
//! matching.

use std::collections::HashSet;
use std::fs::File;

use log::debug;

use crate::error::Error::{
    EmptyName, InvalidParameterBounds, NameWithSpace, NonUniqueCommandName,
    NonUniqueParameterName, NonUniquePositionName,
};
use crate::error::{Error, Result};
use crate::model::{Command, CommandDefinition};

fn get_reader(file_description: &str, path: &str) -> Result<File> {
    match File::open(path) {
        Ok(reader) => Ok(reader),
        Err(e) => Err(Error::io_error(
            file_description.to_string(),
            path.to_string(),
            e,
        )),
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(EmptyName);
    }

    if name.chars().any(char::is_whitespace) {
        return Err(NameWithSpace(name.to_string()));
    }

    Ok(())
}

fn validate_positions(command: &Command) -> Result<()> {
    let mut names = HashSet::new();

    for position in command.positions() {
        let name = position.name().ok_or(EmptyName)?;
        validate_name(name)?;

        if !names.insert(name) {
            return Err(NonUniquePositionName(
                command.name().to_string(),
                name.to_string(),
            ));
        }
    }

    Ok(())
}

/// Flag names must be unique per command, and so must key names; a flag and
/// a key may share a name since they are told apart by their indicator.
fn validate_parameter_names(command: &Command) -> Result<()> {
    let mut flag_names = HashSet::new();
    let mut key_names = HashSet::new();

    for position in command.all_positions() {
        for flag in position.flags() {
            validate_name(&flag.name)?;

            if !flag_names.insert(flag.name.as_str()) {
                return Err(NonUniqueParameterName(
                    command.name().to_string(),
                    flag.name.clone(),
                ));
            }
        }

        for key in position.keys() {
            validate_name(&key.name)?;

            if !key_names.insert(key.name.as_str()) {
                return Err(NonUniqueParameterName(
                    command.name().to_string(),
                    key.name.clone(),
                ));
            }
        }
    }

    Ok(())
}

fn validate_bounds(command: &Command) -> Result<()> {
    if let (Some(minimum), Some(maximum)) = command.explicit_parameter_bounds() {
        if minimum > maximum {
            return Err(InvalidParameterBounds {
                command: command.name().to_string(),
                minimum,
                maximum,
            });
        }
    }

    Ok(())
}

/// Validates a set of commands built in code or loaded from a file.
///
/// # Errors
///
/// Returns an error if:
/// - A command, position, flag or key name is empty or contains whitespace
/// - Two commands share a name
/// - Two positions of one command share a name
/// - Two flags, or two keys, of one command share a name
/// - An explicit minimum parameter count exceeds the explicit maximum
pub fn validate_commands(commands: &[Command]) -> Result<()> {
    let mut names = HashSet::new();

    for command in commands {
        validate_name(command.name())?;

        if !names.insert(command.name()) {
            return Err(NonUniqueCommandName(command.name().to_string()));
        }

        validate_positions(command)?;
        validate_parameter_names(command)?;
        validate_bounds(command)?;
    }

    Ok(())
}

/// Parses and validates command definitions from YAML text.
///
/// `source` only names the origin of the text in error messages.
///
/// # Errors
///
/// Returns an error if the YAML is malformed, holds no commands, or fails
/// [`validate_commands`].
pub fn parse_command_definitions(yaml: &str, source: &str) -> Result<Vec<Command>> {
    let definitions: Vec<CommandDefinition> = serde_yaml::from_str(yaml).map_err(|e| {
        Error::yaml_error(
            "parsing".to_string(),
            "command definitions".to_string(),
            source.to_string(),
            e,
        )
    })?;

    into_commands(definitions, source)
}

fn into_commands(definitions: Vec<CommandDefinition>, source: &str) -> Result<Vec<Command>> {
    if definitions.is_empty() {
        return Err(Error::empty_command_definition(source.to_string()));
    }

    let commands: Vec<Command> = definitions.into_iter().map(Command::from).collect();
    validate_commands(&commands)?;

    debug!("Loaded {} command(s) from `{}`", commands.len(), source);

    Ok(commands)
}

/// Loads and validates command definitions from a configuration file.
///
/// # Arguments
///
/// * `definitions_path` - Path to the YAML definitions file
///
/// # Returns
///
/// A vector of validated commands, in file order
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The YAML is malformed or doesn't match the expected structure
/// - The file holds no commands
/// - Any name is invalid or non-unique
///
/// # Examples
///
/// ```no_run
/// use cmdmatch_core::file_handling::get_command_definitions;
///
/// let commands = get_command_definitions("commands.yml")?;
/// println!("Loaded {} commands", commands.len());
/// # Ok::<(), cmdmatch_core::error::Error>(())
/// ```
pub fn get_command_definitions(definitions_path: &str) -> Result<Vec<Command>> {
    let reader = get_reader("command definitions", definitions_path)?;

    let definitions: Vec<CommandDefinition> = serde_yaml::from_reader(reader).map_err(|e| {
        Error::yaml_error(
            "reading".to_string(),
            "command definitions".to_string(),
            definitions_path.to_string(),
            e,
        )
    })?;

    into_commands(definitions, definitions_path)
}
