//! cmdmatch Core Library
//!
//! This crate matches a raw token sequence, typically a process's arguments,
//! against a declarative description of the commands a program supports. It
//! determines which command was invoked, which flags and keys were given, and
//! the typed values of keys and free arguments, while enforcing required
//! elements, mutually exclusive alternatives and parameter-count bounds.
//!
//! # Key Features
//!
//! - **Descriptor Model**: Commands with a base position and named positions
//!   holding flags, keys and typed arguments
//! - **Type Validation**: Semantic types from plain text to dates, paths,
//!   e-mail addresses, IP addresses and URLs
//! - **Matching Engine**: Per-parse locking of named positions, indicator
//!   prefixes or free mode, and count checks
//! - **Dispatching**: Selection of a command by its name
//! - **Configuration**: Loading and validating command definitions from YAML
//!
//! # Examples
//!
//! ```
//! use cmdmatch_core::dispatcher::Dispatcher;
//! use cmdmatch_core::model::{Command, Flag, Key};
//! use cmdmatch_core::value_type::{Value, ValueType};
//!
//! let commands = vec![Command::new("build")
//!     .key(Key::new("target", ValueType::All).important())
//!     .flag(Flag::new("verbose"))];
//!
//! let dispatcher = Dispatcher::with_source(["build", "--target", "release", "-verbose"]);
//! let parsed = dispatcher.dispatch(&commands)?.expect("`build` is defined");
//!
//! assert!(parsed.has_flag("verbose"));
//! assert_eq!(parsed.key("target"), Some(&Value::from("release")));
//! # Ok::<(), cmdmatch_core::error::Error>(())
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod file_handling;
pub mod matcher;
pub mod model;
pub mod parsed;
pub mod value_type;
