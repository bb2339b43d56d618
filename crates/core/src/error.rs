use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Flag and key indicators must differ, both were set to `{}`", .indicator)]
    IdenticalIndicators { indicator: String },

    #[error("Invalid value `{}`: expected a value of type {}", .token, .expected)]
    InvalidParameterType { token: String, expected: String },

    #[error(
        "Parameter `{}` conflicts with `{}`: both belong to position `{}`",
        .conflicting,
        .locked_by,
        .position
    )]
    MutuallyExclusiveParameters {
        position: String,
        locked_by: String,
        conflicting: String,
    },

    #[error("Key `{}` was given without a value", .0)]
    UnboundKey(String),

    #[error("Unknown flag: `{}`", .0)]
    UnknownFlag(String),

    #[error("Unknown key: `{}`", .0)]
    UnknownKey(String),

    #[error(
        "Too many parameters for command `{}`: expected at most {}, got {}",
        .command,
        .maximum,
        .given
    )]
    TooManyParameters {
        command: String,
        maximum: usize,
        given: usize,
    },

    #[error(
        "Not enough parameters for command `{}`: expected at least {}, got {}",
        .command,
        .minimum,
        .given
    )]
    NotEnoughParameters {
        command: String,
        minimum: usize,
        given: usize,
    },

    #[error("Error {} {} file at `{}`: {}", .action, .file_description, .path, .original)]
    Yaml {
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} file at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("No commands were found in the command definition YAML. Is `{}` empty?", .path)]
    EmptyCommandDefinition { path: String },

    #[error("Invalid name: name may not be empty")]
    EmptyName,

    #[error("Invalid name `{}`: name may not contain whitespace", .0)]
    NameWithSpace(String),

    #[error("Found a non-unique command name: `{}`", .0)]
    NonUniqueCommandName(String),

    #[error("Found a non-unique position name on command {}: `{}`", .0, .1)]
    NonUniquePositionName(String, String),

    #[error("Found a non-unique parameter name on command {}: `{}`", .0, .1)]
    NonUniqueParameterName(String, String),

    #[error(
        "Invalid parameter bounds on command {}: minimum {} is greater than maximum {}",
        .command,
        .minimum,
        .maximum
    )]
    InvalidParameterBounds {
        command: String,
        minimum: usize,
        maximum: usize,
    },
}

impl Error {
    pub fn invalid_parameter_type(token: &str, expected: impl ToString) -> Self {
        Self::InvalidParameterType {
            token: token.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn mutually_exclusive(position: &str, locked_by: &str, conflicting: &str) -> Self {
        Self::MutuallyExclusiveParameters {
            position: position.to_string(),
            locked_by: locked_by.to_string(),
            conflicting: conflicting.to_string(),
        }
    }

    pub fn empty_command_definition(path: String) -> Self {
        Self::EmptyCommandDefinition { path }
    }

    pub fn yaml_error(
        action: String,
        file_description: String,
        path: String,
        original: serde_yaml::Error,
    ) -> Self {
        Self::Yaml {
            action,
            file_description,
            path,
            original,
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    /// Whether this error was raised while matching tokens, as opposed to
    /// while loading or configuring descriptors.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameterType { .. }
                | Self::MutuallyExclusiveParameters { .. }
                | Self::UnboundKey(_)
                | Self::UnknownFlag(_)
                | Self::UnknownKey(_)
                | Self::TooManyParameters { .. }
                | Self::NotEnoughParameters { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutually_exclusive_message_names_everything() {
        let error = Error::mutually_exclusive("mode", "fast", "-safe");
        let message = error.to_string();
        assert!(message.contains("mode"));
        assert!(message.contains("fast"));
        assert!(message.contains("-safe"));
    }

    #[test]
    fn test_invalid_parameter_type_message() {
        let error = Error::invalid_parameter_type("abc", "Integer");
        assert_eq!(
            error.to_string(),
            "Invalid value `abc`: expected a value of type Integer"
        );
    }

    #[test]
    fn test_is_parse_failure() {
        assert!(Error::UnboundKey("target".to_string()).is_parse_failure());
        assert!(!Error::EmptyName.is_parse_failure());
        assert!(!Error::IdenticalIndicators {
            indicator: "-".to_string()
        }
        .is_parse_failure());
    }
}
