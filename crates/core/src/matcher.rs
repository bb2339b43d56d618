//! Token classification for a single command.
//!
//! [`Matcher::parse`] walks the tokens after the command name from left to
//! right. Each unconsumed token is tried as a flag, then as a key (taking the
//! next token as its value), then as a free argument. Matching an element of
//! a named position locks that position for the rest of the parse.
//!
//! All per-parse bookkeeping lives in a [`ParseContext`] created inside
//! `parse`, so one [`Command`] can be parsed against from many threads.

use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{Command, Position};
use crate::parsed::ParsedCommandData;
use crate::value_type::Value;

pub const DEFAULT_FLAG_INDICATOR: &str = "-";
pub const DEFAULT_KEY_INDICATOR: &str = "--";

/// Prefixes marking a token as a flag or a key reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indicators {
    flag: String,
    key: String,
}

impl Indicators {
    /// # Errors
    ///
    /// Returns [`Error::IdenticalIndicators`] if both prefixes are equal.
    pub fn new(flag: &str, key: &str) -> Result<Self> {
        if flag == key {
            return Err(Error::IdenticalIndicators {
                indicator: flag.to_string(),
            });
        }

        Ok(Self {
            flag: flag.to_string(),
            key: key.to_string(),
        })
    }

    #[must_use]
    pub fn flag(&self) -> &str {
        &self.flag
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// # Errors
    ///
    /// Returns [`Error::IdenticalIndicators`] if `flag` equals the key indicator.
    pub fn with_flag(&self, flag: &str) -> Result<Self> {
        Self::new(flag, &self.key)
    }

    /// # Errors
    ///
    /// Returns [`Error::IdenticalIndicators`] if `key` equals the flag indicator.
    pub fn with_key(&self, key: &str) -> Result<Self> {
        Self::new(&self.flag, key)
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self {
            flag: DEFAULT_FLAG_INDICATOR.to_string(),
            key: DEFAULT_KEY_INDICATOR.to_string(),
        }
    }
}

/// How tokens are compared against flag and key names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Flags and keys must carry their indicator prefix.
    #[default]
    Prefixed,
    /// Tokens are compared against names as they are; indicators are ignored.
    Free,
}

/// Which position of a command an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Base,
    Named(usize),
}

/// Mutable state of one parse. Never outlives the call that created it.
struct ParseContext {
    consumed: Vec<bool>,
    locks: Vec<Option<String>>,
    flags: IndexSet<String>,
    keys: IndexMap<String, Value>,
    arguments: Vec<Value>,
}

impl ParseContext {
    fn new(token_count: usize, position_count: usize) -> Self {
        let mut consumed = vec![false; token_count];
        if let Some(name) = consumed.first_mut() {
            *name = true;
        }

        Self {
            consumed,
            locks: vec![None; position_count],
            flags: IndexSet::new(),
            keys: IndexMap::new(),
            arguments: Vec::new(),
        }
    }

    fn is_consumed(&self, index: usize) -> bool {
        self.consumed.get(index).copied().unwrap_or(false)
    }

    fn consume(&mut self, index: usize) {
        if let Some(consumed) = self.consumed.get_mut(index) {
            *consumed = true;
        }
    }

    fn locked_by(&self, position_index: usize) -> Option<&str> {
        self.locks.get(position_index).and_then(Option::as_deref)
    }

    fn lock(&mut self, slot: Slot, parameter: &str) {
        if let Slot::Named(position_index) = slot {
            if let Some(lock) = self.locks.get_mut(position_index) {
                debug!("Locking position {position_index} by `{parameter}`");
                *lock = Some(parameter.to_string());
            }
        }
    }

    fn unlocked_positions<'c>(&self, command: &'c Command) -> Vec<(Slot, &'c Position)> {
        let named = command
            .positions()
            .iter()
            .enumerate()
            .filter(|(index, _)| self.locked_by(*index).is_none())
            .map(|(index, position)| (Slot::Named(index), position));

        std::iter::once((Slot::Base, command.base()))
            .chain(named)
            .collect()
    }

    fn finish(self, command: &Command) -> ParsedCommandData {
        ParsedCommandData::new(
            command.name().to_string(),
            self.flags,
            self.keys,
            self.arguments,
        )
    }
}

/// Classifies the tokens of one invocation against a [`Command`].
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    indicators: Indicators,
    mode: Mode,
}

impl Matcher {
    #[must_use]
    pub fn new(indicators: Indicators) -> Self {
        Self {
            indicators,
            mode: Mode::Prefixed,
        }
    }

    /// A matcher that compares tokens to names without any prefix.
    #[must_use]
    pub fn free() -> Self {
        Self {
            indicators: Indicators::default(),
            mode: Mode::Free,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn indicators(&self) -> &Indicators {
        &self.indicators
    }

    pub fn set_indicators(&mut self, indicators: Indicators) {
        self.indicators = indicators;
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Matches `tokens` against `command`. Token 0 is the command name and is
    /// not inspected.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A key value does not satisfy the key's type
    /// - A key is the last token and has no value (outside free mode)
    /// - A flag or key targets a position already locked by another parameter
    /// - A token carries an indicator but names no known flag or key
    /// - The parameter count is outside the command's bounds, when the
    ///   command asks for that check
    pub fn parse<S: AsRef<str>>(
        &self,
        command: &Command,
        tokens: &[S],
    ) -> Result<ParsedCommandData> {
        let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
        let mut context = ParseContext::new(tokens.len(), command.positions().len());

        debug!(
            "Matching {} parameter(s) against command `{}`",
            tokens.len().saturating_sub(1),
            command.name()
        );

        for index in 1..tokens.len() {
            if context.is_consumed(index) {
                continue;
            }

            if self.match_flag(command, &tokens, index, &mut context) {
                continue;
            }

            if self.match_key(command, &tokens, index, &mut context)? {
                continue;
            }

            self.check_locked(command, tokens[index], &context)?;
            Self::match_argument(command, &tokens, index, &mut context);
        }

        if self.mode == Mode::Prefixed {
            self.check_unknown(&tokens, &context)?;
        }

        if command.checks_parameter_count() {
            check_parameter_count(command, tokens.len().saturating_sub(1))?;
        }

        Ok(context.finish(command))
    }

    fn strip<'t>(&self, token: &'t str, indicator: &str) -> Option<&'t str> {
        match self.mode {
            Mode::Free => Some(token),
            Mode::Prefixed => token.strip_prefix(indicator),
        }
    }

    fn match_flag(
        &self,
        command: &Command,
        tokens: &[&str],
        index: usize,
        context: &mut ParseContext,
    ) -> bool {
        let Some(name) = self.strip(tokens[index], self.indicators.flag()) else {
            return false;
        };

        for (slot, position) in context.unlocked_positions(command) {
            if let Some(flag) = position.find_flag(name) {
                debug!("`{}` is flag `{}` of {}", tokens[index], flag.name, position);
                context.consume(index);
                context.flags.insert(flag.name.clone());
                context.lock(slot, &flag.name);
                return true;
            }
        }

        false
    }

    fn match_key(
        &self,
        command: &Command,
        tokens: &[&str],
        index: usize,
        context: &mut ParseContext,
    ) -> Result<bool> {
        let Some(name) = self.strip(tokens[index], self.indicators.key()) else {
            return Ok(false);
        };

        for (slot, position) in context.unlocked_positions(command) {
            let Some(key) = position.find_key(name) else {
                continue;
            };

            let Some(value_token) = tokens.get(index + 1) else {
                if self.mode == Mode::Free {
                    debug!("Key `{}` has no value, treating it as an argument", key.name);
                    return Ok(false);
                }

                return Err(Error::UnboundKey(key.name.clone()));
            };

            let value = key.value_type.check(value_token)?;
            debug!("`{}` is key `{}` of {} = {}", tokens[index], key.name, position, value);

            context.consume(index);
            context.consume(index + 1);
            context.keys.insert(key.name.clone(), value);
            context.lock(slot, &key.name);
            return Ok(true);
        }

        Ok(false)
    }

    /// Fails if `token` names a flag or key of a position that is already
    /// locked by another parameter.
    fn check_locked(&self, command: &Command, token: &str, context: &ParseContext) -> Result<()> {
        for (index, position) in command.positions().iter().enumerate() {
            let Some(locked_by) = context.locked_by(index) else {
                continue;
            };

            let flag = self
                .strip(token, self.indicators.flag())
                .and_then(|name| position.find_flag(name))
                .map(|flag| flag.name.as_str());
            let key = self
                .strip(token, self.indicators.key())
                .and_then(|name| position.find_key(name))
                .map(|key| key.name.as_str());

            if let Some(conflicting) = flag.or(key) {
                return Err(Error::mutually_exclusive(
                    position.label(),
                    locked_by,
                    conflicting,
                ));
            }
        }

        Ok(())
    }

    /// Binds the token to the first argument type any unlocked position
    /// accepts. A token no type accepts is kept as raw text and left
    /// unconsumed.
    fn match_argument(command: &Command, tokens: &[&str], index: usize, context: &mut ParseContext) {
        let token = tokens[index];

        for (slot, position) in context.unlocked_positions(command) {
            let value = position
                .arguments()
                .iter()
                .find_map(|argument| argument.value_type.probe(token));

            if let Some(value) = value {
                debug!("`{token}` is an argument of {position}");
                context.consume(index);
                context.lock(slot, token);
                context.arguments.push(value);
                return;
            }
        }

        warn!("`{token}` matched no argument type, binding it as text");
        context.arguments.push(Value::from(token));
    }

    fn check_unknown(&self, tokens: &[&str], context: &ParseContext) -> Result<()> {
        let flag_indicator = self.indicators.flag();
        let key_indicator = self.indicators.key();

        for (index, token) in tokens.iter().enumerate() {
            if context.is_consumed(index) {
                continue;
            }

            let is_flag = !flag_indicator.is_empty() && token.starts_with(flag_indicator);
            let is_key = !key_indicator.is_empty() && token.starts_with(key_indicator);

            // The longer indicator wins so `--x` is not read as a flag named `-x`.
            if key_indicator.len() >= flag_indicator.len() {
                if is_key {
                    return Err(Error::UnknownKey((*token).to_string()));
                }
                if is_flag {
                    return Err(Error::UnknownFlag((*token).to_string()));
                }
            } else {
                if is_flag {
                    return Err(Error::UnknownFlag((*token).to_string()));
                }
                if is_key {
                    return Err(Error::UnknownKey((*token).to_string()));
                }
            }
        }

        Ok(())
    }
}

fn check_parameter_count(command: &Command, given: usize) -> Result<()> {
    let minimum = command.get_min_parameters();
    let maximum = command.get_max_parameters();

    if given > maximum {
        return Err(Error::TooManyParameters {
            command: command.name().to_string(),
            maximum,
            given,
        });
    }

    if given < minimum {
        return Err(Error::NotEnoughParameters {
            command: command.name().to_string(),
            minimum,
            given,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Argument, Flag, Key};
    use crate::value_type::ValueType;

    fn build_command() -> Command {
        Command::new("build")
            .check_parameter_count(true)
            .key(Key::new("target", ValueType::All).important())
            .flag(Flag::new("verbose"))
    }

    fn copy_command() -> Command {
        Command::new("copy").position(
            Position::named("mode")
                .flag(Flag::new("fast"))
                .flag(Flag::new("safe"))
                .key(Key::new("speed", ValueType::Integer)),
        )
    }

    #[test]
    fn test_flag_and_key() {
        let parsed = Matcher::default()
            .parse(&build_command(), &["build", "--target", "release", "-verbose"])
            .unwrap();

        assert_eq!(parsed.command(), "build");
        assert!(parsed.has_flag("verbose"));
        assert_eq!(parsed.flags().len(), 1);
        assert_eq!(parsed.key("target"), Some(&Value::from("release")));
        assert!(parsed.arguments().is_empty());
    }

    #[test]
    fn test_missing_important_key_fails_count_check() {
        let result = Matcher::default().parse(&build_command(), &["build"]);
        assert!(matches!(
            result,
            Err(Error::NotEnoughParameters {
                minimum: 2,
                given: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_too_many_parameters() {
        let result = Matcher::default().parse(
            &build_command(),
            &["build", "--target", "release", "-verbose", "extra"],
        );
        assert!(matches!(
            result,
            Err(Error::TooManyParameters {
                maximum: 3,
                given: 4,
                ..
            })
        ));
    }

    #[test]
    fn test_count_inside_bounds_passes() {
        let parsed = Matcher::default()
            .parse(&build_command(), &["build", "--target", "debug"])
            .unwrap();
        assert!(!parsed.has_flag("verbose"));
    }

    #[test]
    fn test_mutually_exclusive_flags() {
        let result = Matcher::default().parse(&copy_command(), &["copy", "-fast", "-safe"]);
        match result {
            Err(Error::MutuallyExclusiveParameters {
                position,
                locked_by,
                conflicting,
            }) => {
                assert_eq!(position, "mode");
                assert_eq!(locked_by, "fast");
                assert_eq!(conflicting, "safe");
            }
            other => panic!("Expected MutuallyExclusiveParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_key_conflicts_with_flag_on_same_position() {
        let result =
            Matcher::default().parse(&copy_command(), &["copy", "--speed", "3", "-fast"]);
        assert!(matches!(
            result,
            Err(Error::MutuallyExclusiveParameters { .. })
        ));
    }

    #[test]
    fn test_unbound_key() {
        let result = Matcher::default().parse(&build_command(), &["build", "--target"]);
        assert!(matches!(result, Err(Error::UnboundKey(name)) if name == "target"));
    }

    #[test]
    fn test_key_value_is_type_checked() {
        let result = Matcher::default().parse(&copy_command(), &["copy", "--speed", "fast"]);
        assert!(matches!(
            result,
            Err(Error::InvalidParameterType { token, expected })
                if token == "fast" && expected == "Integer"
        ));
    }

    #[test]
    fn test_key_value_is_never_reconsidered() {
        let command = copy_command().flag(Flag::new("verbose"));
        let parsed = Matcher::default()
            .parse(&command, &["copy", "--speed", "7", "-verbose"])
            .unwrap();

        assert_eq!(parsed.key("speed"), Some(&Value::Integer(7)));
        assert!(parsed.has_flag("verbose"));
        assert!(parsed.arguments().is_empty());
    }

    #[test]
    fn test_key_value_may_look_like_a_flag() {
        let command = Command::new("echo")
            .key(Key::new("text", ValueType::All))
            .flag(Flag::new("loud"));
        let parsed = Matcher::default()
            .parse(&command, &["echo", "--text", "-loud"])
            .unwrap();

        assert_eq!(parsed.key("text"), Some(&Value::from("-loud")));
        assert!(!parsed.has_flag("loud"));
    }

    #[test]
    fn test_unknown_flag_and_key() {
        let matcher = Matcher::default();
        let command = build_command().check_parameter_count(false);

        let result = matcher.parse(&command, &["build", "-quiet"]);
        assert!(matches!(result, Err(Error::UnknownFlag(token)) if token == "-quiet"));

        let result = matcher.parse(&command, &["build", "--host", "x"]);
        assert!(matches!(result, Err(Error::UnknownKey(token)) if token == "--host"));
    }

    #[test]
    fn test_longer_indicator_is_compared_first() {
        let indicators = Indicators::new("--", "-").unwrap();
        let command = Command::new("run");

        let result = Matcher::new(indicators).parse(&command, &["run", "--nope"]);
        assert!(matches!(result, Err(Error::UnknownFlag(token)) if token == "--nope"));
    }

    #[test]
    fn test_arguments_keep_stream_order_and_types() {
        let command = Command::new("add")
            .argument(Argument::new(ValueType::Integer))
            .flag(Flag::new("verbose"));
        let parsed = Matcher::default()
            .parse(&command, &["add", "1", "-verbose", "-2", "x"])
            .unwrap();

        assert_eq!(
            parsed.arguments(),
            &[Value::Integer(1), Value::Integer(-2), Value::from("x")]
        );
    }

    #[test]
    fn test_untyped_fallback_for_indicator_token_is_unknown() {
        let command = Command::new("add").argument(Argument::new(ValueType::Integer));
        let result = Matcher::default().parse(&command, &["add", "-x"]);
        assert!(matches!(result, Err(Error::UnknownFlag(token)) if token == "-x"));
    }

    #[test]
    fn test_argument_locks_named_position() {
        let command = Command::new("fetch").position(
            Position::named("source")
                .argument(Argument::new(ValueType::Url))
                .flag(Flag::new("stdin")),
        );

        let result =
            Matcher::default().parse(&command, &["fetch", "https://example.org", "-stdin"]);
        match result {
            Err(Error::MutuallyExclusiveParameters {
                position,
                locked_by,
                ..
            }) => {
                assert_eq!(position, "source");
                assert_eq!(locked_by, "https://example.org");
            }
            other => panic!("Expected MutuallyExclusiveParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_locked_position_stops_offering_argument_types() {
        let command = Command::new("pick").position(
            Position::named("first").argument(Argument::new(ValueType::Integer)),
        );
        let parsed = Matcher::default()
            .parse(&command, &["pick", "1", "2"])
            .unwrap();

        // The second integer falls back to raw text once `first` is locked.
        assert_eq!(parsed.arguments(), &[Value::Integer(1), Value::from("2")]);
    }

    #[test]
    fn test_separate_positions_do_not_conflict() {
        let command = Command::new("copy")
            .position(Position::named("mode").flag(Flag::new("fast")))
            .position(Position::named("output").flag(Flag::new("quiet")));
        let parsed = Matcher::default()
            .parse(&command, &["copy", "-fast", "-quiet"])
            .unwrap();

        assert!(parsed.has_flag("fast"));
        assert!(parsed.has_flag("quiet"));
    }

    #[test]
    fn test_repeated_base_flag_is_idempotent() {
        let command = Command::new("build").flag(Flag::new("verbose"));
        let parsed = Matcher::default()
            .parse(&command, &["build", "-verbose", "-verbose"])
            .unwrap();
        assert_eq!(parsed.flags().len(), 1);
    }

    #[test]
    fn test_free_mode_matches_bare_names() {
        let command = Command::new("git")
            .flag(Flag::new("verbose"))
            .key(Key::new("branch", ValueType::Alpha))
            .argument(Argument::new(ValueType::All));
        let parsed = Matcher::free()
            .parse(&command, &["git", "verbose", "branch", "main", "readme"])
            .unwrap();

        assert!(parsed.has_flag("verbose"));
        assert_eq!(parsed.key("branch"), Some(&Value::from("main")));
        assert_eq!(parsed.arguments(), &[Value::from("readme")]);
    }

    #[test]
    fn test_free_mode_trailing_key_becomes_argument() {
        let command = Command::new("git").key(Key::new("branch", ValueType::All));
        let parsed = Matcher::free().parse(&command, &["git", "branch"]).unwrap();

        assert!(parsed.keys().is_empty());
        assert_eq!(parsed.arguments(), &[Value::from("branch")]);
    }

    #[test]
    fn test_free_mode_skips_unknown_check() {
        let command = Command::new("run");
        let parsed = Matcher::free().parse(&command, &["run", "-x", "--y"]).unwrap();
        assert_eq!(
            parsed.arguments(),
            &[Value::from("-x"), Value::from("--y")]
        );
    }

    #[test]
    fn test_free_mode_valid_path_argument_falls_back() {
        let command = Command::new("run").argument(Argument::new(ValueType::ValidPath));
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("input.txt");
        std::fs::write(&existing, "data").unwrap();
        let existing = existing.to_str().unwrap();

        let parsed = Matcher::free().parse(&command, &["run", existing]).unwrap();
        assert_eq!(parsed.arguments(), &[Value::from(existing)]);

        let missing = dir.path().join("missing.txt");
        let missing = missing.to_str().unwrap();
        let parsed = Matcher::free().parse(&command, &["run", missing]).unwrap();
        assert_eq!(parsed.arguments(), &[Value::from(missing)]);
    }

    #[test]
    fn test_identical_indicators_rejected() {
        assert!(matches!(
            Indicators::new("-", "-"),
            Err(Error::IdenticalIndicators { indicator }) if indicator == "-"
        ));

        let indicators = Indicators::default();
        assert!(indicators.with_flag("--").is_err());
        assert_eq!(indicators.with_key("+").unwrap().key(), "+");
    }

    #[test]
    fn test_custom_indicators() {
        let indicators = Indicators::new("/", "//").unwrap();
        let parsed = Matcher::new(indicators)
            .parse(&build_command(), &["build", "//target", "x86", "/verbose"])
            .unwrap();

        assert!(parsed.has_flag("verbose"));
        assert_eq!(parsed.key("target"), Some(&Value::from("x86")));
    }
}
