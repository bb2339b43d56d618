//! Selection of a command by name.
//!
//! A [`Dispatcher`] holds the raw token source and a [`Matcher`]. It looks
//! up the command whose name equals the first token and hands the tokens
//! over to the matcher. The command list is owned by the caller and passed
//! into every call.

use std::env;

use log::{debug, info};

use crate::error::Result;
use crate::matcher::{Indicators, Matcher, Mode};
use crate::model::Command;
use crate::parsed::ParsedCommandData;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    source: Vec<String>,
    matcher: Matcher,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// A dispatcher reading the process arguments, program name excluded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(env::args().skip(1))
    }

    #[must_use]
    pub fn with_source<I, S>(source: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into_iter().map(Into::into).collect(),
            matcher: Matcher::default(),
        }
    }

    #[must_use]
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn set_source<I, S>(&mut self, source: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = source.into_iter().map(Into::into).collect();
    }

    #[must_use]
    pub fn source(&self) -> &[String] {
        &self.source
    }

    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Changes the flag indicator. On error the previous indicators stay.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::IdenticalIndicators`] if `flag` equals
    /// the key indicator.
    pub fn set_flag_indicator(&mut self, flag: &str) -> Result<()> {
        let indicators = self.matcher.indicators().with_flag(flag)?;
        self.matcher.set_indicators(indicators);
        Ok(())
    }

    /// Changes the key indicator. On error the previous indicators stay.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::IdenticalIndicators`] if `key` equals
    /// the flag indicator.
    pub fn set_key_indicator(&mut self, key: &str) -> Result<()> {
        let indicators = self.matcher.indicators().with_key(key)?;
        self.matcher.set_indicators(indicators);
        Ok(())
    }

    pub fn set_indicators(&mut self, indicators: Indicators) {
        self.matcher.set_indicators(indicators);
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.matcher.set_mode(mode);
    }

    /// Finds the command named by the first token and matches the rest of the
    /// tokens against it.
    ///
    /// Returns `Ok(None)` when the source is empty or no command has that name.
    ///
    /// # Errors
    ///
    /// Returns whatever error [`Matcher::parse`] raises for the selected
    /// command; they are not translated here.
    pub fn dispatch(&self, commands: &[Command]) -> Result<Option<ParsedCommandData>> {
        let Some(name) = self.source.first() else {
            debug!("No tokens to dispatch");
            return Ok(None);
        };

        let Some(command) = commands.iter().find(|command| command.name() == name) else {
            info!("No command named `{name}`");
            return Ok(None);
        };

        let parsed = self.matcher.parse(command, &self.source)?;
        info!("Matched command `{}`", parsed.command());

        Ok(Some(parsed))
    }
}
