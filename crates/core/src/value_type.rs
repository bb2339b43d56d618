//! Semantic types for key values and free arguments.
//!
//! Every [`ValueType`] variant knows how to decide whether a raw token
//! satisfies it and how to turn the token into a typed [`Value`]. The
//! matcher uses [`ValueType::check`] for key values, where a mismatch aborts
//! the parse, and [`ValueType::probe`] when it is only testing whether a
//! token could be an argument of some type.

use std::fmt::{Display, Formatter};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

static BASE64_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$")
        .expect("base64 pattern compiles")
});

/// Formats tried, in order, when reading a calendar date.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%Y%m%d",
];

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// The declared type of a key value or an argument.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueType {
    #[default]
    All,
    Alpha,
    Bool,
    Number,
    Integer,
    Float,
    Date,
    ValidPath,
    Base64,
    Email,
    #[serde(rename = "IPv4")]
    Ipv4,
    #[serde(rename = "IPv6")]
    Ipv6,
    #[serde(rename = "URL")]
    Url,
}

/// A token after it has been accepted by a [`ValueType`].
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
}

impl ValueType {
    /// Every supported type, in declaration order.
    pub const ALL: [ValueType; 13] = [
        ValueType::All,
        ValueType::Alpha,
        ValueType::Bool,
        ValueType::Number,
        ValueType::Integer,
        ValueType::Float,
        ValueType::Date,
        ValueType::ValidPath,
        ValueType::Base64,
        ValueType::Email,
        ValueType::Ipv4,
        ValueType::Ipv6,
        ValueType::Url,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ValueType::All => "All",
            ValueType::Alpha => "Alpha",
            ValueType::Bool => "Bool",
            ValueType::Number => "Number",
            ValueType::Integer => "Integer",
            ValueType::Float => "Float",
            ValueType::Date => "Date",
            ValueType::ValidPath => "ValidPath",
            ValueType::Base64 => "Base64",
            ValueType::Email => "Email",
            ValueType::Ipv4 => "IPv4",
            ValueType::Ipv6 => "IPv6",
            ValueType::Url => "URL",
        }
    }

    /// Tests `token` against this type without failing.
    ///
    /// Returns `None` when the token does not satisfy the type.
    #[must_use]
    pub fn probe(self, token: &str) -> Option<Value> {
        match self {
            ValueType::All => Some(text(token)),
            ValueType::Alpha => {
                (!token.is_empty() && token.chars().all(char::is_alphabetic)).then(|| text(token))
            }
            ValueType::Bool => match token.to_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            ValueType::Number => parse_number(token),
            ValueType::Integer => parse_integer(token).map(Value::Integer),
            ValueType::Float => parse_float(token).map(Value::Float),
            ValueType::Date => parse_date(token).map(Value::Date),
            ValueType::ValidPath => Path::new(token).exists().then(|| text(token)),
            ValueType::Base64 => {
                (!token.is_empty() && BASE64_PATTERN.is_match(token)).then(|| text(token))
            }
            ValueType::Email => EMAIL_PATTERN.is_match(token).then(|| text(token)),
            ValueType::Ipv4 => token.parse::<Ipv4Addr>().is_ok().then(|| text(token)),
            ValueType::Ipv6 => token.parse::<Ipv6Addr>().is_ok().then(|| text(token)),
            ValueType::Url => is_url(token).then(|| text(token)),
        }
    }

    /// Tests `token` against this type, failing on a mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameterType`] carrying the token and the
    /// expected type name when the token does not satisfy the type.
    pub fn check(self, token: &str) -> Result<Value> {
        self.probe(token)
            .ok_or_else(|| Error::invalid_parameter_type(token, self))
    }
}

impl Display for ValueType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to floats here, so a `Number` value can always be read
    /// as a float.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => formatter.write_str(s),
            Value::Bool(b) => write!(formatter, "{b}"),
            Value::Integer(i) => write!(formatter, "{i}"),
            Value::Float(f) => write!(formatter, "{f}"),
            Value::Date(d) => write!(formatter, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        text(value)
    }
}

fn text(token: &str) -> Value {
    Value::Text(token.to_string())
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_number(token: &str) -> Option<Value> {
    if token.contains('.') {
        token
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
    } else {
        token.parse::<i64>().ok().map(Value::Integer)
    }
}

fn parse_integer(token: &str) -> Option<i64> {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    if !is_ascii_digits(unsigned) {
        return None;
    }

    token.parse().ok()
}

fn parse_float(token: &str) -> Option<f64> {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    if unsigned.matches('.').count() > 1 || !is_ascii_digits(&unsigned.replace('.', "")) {
        return None;
    }

    token.parse().ok()
}

fn parse_date(token: &str) -> Option<NaiveDate> {
    let token = token.trim();

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
    {
        return Some(date);
    }

    if let Some(date_time) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(token, format).ok())
    {
        return Some(date_time.date());
    }

    DateTime::parse_from_rfc3339(token)
        .ok()
        .map(|date_time| date_time.date_naive())
}

fn is_url(token: &str) -> bool {
    match Url::parse(token) {
        Ok(url) => url.has_host() && !url.cannot_be_a_base(),
        Err(_) => false,
    }
}
