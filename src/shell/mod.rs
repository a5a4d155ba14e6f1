//! External command helpers.

pub mod command;

pub use command::{escape_command, CommandReport, CommandRunner, DEFAULT_ESCAPES};
