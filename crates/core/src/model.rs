//! Descriptor model for supported commands.
//!
//! A [`Command`] owns an implicit base [`Position`] plus any number of named
//! positions. Each position holds [`Flag`]s, [`Key`]s and [`Argument`]s. The
//! model is plain data: it is built once, shared freely, and never mutated by
//! a parse.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::value_type::ValueType;

/// Label used for the base position wherever a name is needed for display.
pub const BASE_POSITION_LABEL: &str = "(base)";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Flag {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "important")]
    pub is_important: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Key {
    pub name: String,
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "important")]
    pub is_important: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Argument {
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "important")]
    pub is_important: bool,
}

impl Flag {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            is_important: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }
}

impl Key {
    #[must_use]
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            value_type,
            description: None,
            is_important: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }
}

impl Argument {
    #[must_use]
    pub fn new(value_type: ValueType) -> Self {
        Self {
            value_type,
            description: None,
            is_important: false,
        }
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }
}

impl Display for Flag {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "`{}`", self.name)?;

        if let Some(desc) = &self.description {
            write!(formatter, " ({desc})")?;
        }

        Ok(())
    }
}

impl Display for Key {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "`{}` <{}>", self.name, self.value_type)?;

        if let Some(desc) = &self.description {
            write!(formatter, " ({desc})")?;
        }

        Ok(())
    }
}

impl Display for Argument {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<{}>", self.value_type)?;

        if let Some(desc) = &self.description {
            write!(formatter, " ({desc})")?;
        }

        Ok(())
    }
}

/// A slot on a command.
///
/// The base position is unnamed and accepts any combination of its
/// elements. A named position is filled by at most one of its flags, keys or
/// arguments per parse.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct Position {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "important")]
    is_important: bool,
    #[serde(skip)]
    is_base: bool,
    #[serde(default)]
    flags: Vec<Flag>,
    #[serde(default)]
    keys: Vec<Key>,
    #[serde(default)]
    arguments: Vec<Argument>,
}

impl Position {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn base() -> Self {
        Self {
            is_base: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    #[must_use]
    pub fn key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The name, or [`BASE_POSITION_LABEL`] for an unnamed position.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(BASE_POSITION_LABEL)
    }

    #[must_use]
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// A position is important when marked so itself or when any of its
    /// flags, keys or arguments is.
    #[must_use]
    pub fn is_important(&self) -> bool {
        self.is_important
            || self.flags.iter().any(|flag| flag.is_important)
            || self.keys.iter().any(|key| key.is_important)
            || self.arguments.iter().any(|argument| argument.is_important)
    }

    #[must_use]
    pub fn is_base(&self) -> bool {
        self.is_base
    }

    #[must_use]
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    #[must_use]
    pub fn find_flag(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|flag| flag.name == name)
    }

    #[must_use]
    pub fn find_key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().find(|key| key.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.keys.is_empty() && self.arguments.is_empty()
    }

    /// Smallest number of tokens this position needs.
    ///
    /// The base position counts every important element, two tokens for a
    /// key. A named position needs nothing unless it is important, and then
    /// its cheapest alternative.
    #[must_use]
    pub fn min_parameters(&self) -> usize {
        if self.is_base {
            return self.flags.iter().filter(|flag| flag.is_important).count()
                + self.arguments.iter().filter(|arg| arg.is_important).count()
                + 2 * self.keys.iter().filter(|key| key.is_important).count();
        }

        if !self.is_important() {
            0
        } else if !self.flags.is_empty() || !self.arguments.is_empty() {
            1
        } else if !self.keys.is_empty() {
            2
        } else {
            0
        }
    }

    /// Largest number of tokens this position can take.
    #[must_use]
    pub fn max_parameters(&self) -> usize {
        if self.is_base {
            return self.flags.len() + self.arguments.len() + 2 * self.keys.len();
        }

        if !self.keys.is_empty() {
            2
        } else if !self.flags.is_empty() || !self.arguments.is_empty() {
            1
        } else {
            0
        }
    }
}

impl Display for Position {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.label())?;

        if let Some(desc) = &self.description {
            write!(formatter, " ({desc})")?;
        }

        Ok(())
    }
}

/// Description of one supported command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    description: Option<String>,
    category: Option<String>,
    check_parameter_count: bool,
    base: Position,
    positions: Vec<Position>,
    min_parameters: Option<usize>,
    max_parameters: Option<usize>,
}

impl Command {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            category: None,
            check_parameter_count: false,
            base: Position::base(),
            positions: Vec::new(),
            min_parameters: None,
            max_parameters: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    #[must_use]
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    #[must_use]
    pub fn check_parameter_count(mut self, check: bool) -> Self {
        self.check_parameter_count = check;
        self
    }

    #[must_use]
    pub fn min_parameters(mut self, minimum: usize) -> Self {
        self.min_parameters = Some(minimum);
        self
    }

    #[must_use]
    pub fn max_parameters(mut self, maximum: usize) -> Self {
        self.max_parameters = Some(maximum);
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: Flag) -> Self {
        self.base = self.base.flag(flag);
        self
    }

    #[must_use]
    pub fn key(mut self, key: Key) -> Self {
        self.base = self.base.key(key);
        self
    }

    #[must_use]
    pub fn argument(mut self, argument: Argument) -> Self {
        self.base = self.base.argument(argument);
        self
    }

    #[must_use]
    pub fn position(mut self, mut position: Position) -> Self {
        position.is_base = false;
        self.positions.push(position);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn get_category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn checks_parameter_count(&self) -> bool {
        self.check_parameter_count
    }

    #[must_use]
    pub fn base(&self) -> &Position {
        &self.base
    }

    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// The base position followed by the named positions, in order.
    pub fn all_positions(&self) -> impl Iterator<Item = &Position> {
        std::iter::once(&self.base).chain(self.positions.iter())
    }

    /// Explicit override if set, otherwise the sum over all positions.
    #[must_use]
    pub fn get_min_parameters(&self) -> usize {
        self.min_parameters
            .unwrap_or_else(|| self.all_positions().map(Position::min_parameters).sum())
    }

    /// Explicit override if set, otherwise the sum over all positions.
    #[must_use]
    pub fn get_max_parameters(&self) -> usize {
        self.max_parameters
            .unwrap_or_else(|| self.all_positions().map(Position::max_parameters).sum())
    }

    #[must_use]
    pub fn explicit_parameter_bounds(&self) -> (Option<usize>, Option<usize>) {
        (self.min_parameters, self.max_parameters)
    }
}

impl Display for Command {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(desc) => write!(formatter, "{} ({})", self.name, desc),
            None => formatter.write_str(&self.name),
        }
    }
}

/// On-disk form of a [`Command`]: base position elements sit at the top level
/// next to the list of named positions.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct CommandDefinition {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub check_parameter_count: bool,
    pub min_parameters: Option<usize>,
    pub max_parameters: Option<usize>,
    #[serde(default)]
    pub flags: Vec<Flag>,
    #[serde(default)]
    pub keys: Vec<Key>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl From<CommandDefinition> for Command {
    fn from(definition: CommandDefinition) -> Self {
        let mut base = Position::base();
        base.flags = definition.flags;
        base.keys = definition.keys;
        base.arguments = definition.arguments;

        Self {
            name: definition.name,
            description: definition.description,
            category: definition.category,
            check_parameter_count: definition.check_parameter_count,
            base,
            positions: definition
                .positions
                .into_iter()
                .map(|mut position| {
                    position.is_base = false;
                    position
                })
                .collect(),
            min_parameters: definition.min_parameters,
            max_parameters: definition.max_parameters,
        }
    }
}
