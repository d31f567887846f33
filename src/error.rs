use thiserror::Error;

/// Errors raised while parsing a host console command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The first word is not a known command.
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    /// A required argument was not supplied.
    #[error("`{command}` expects {argument}")]
    MissingArgument {
        /// Command being parsed.
        command: &'static str,
        /// Human description of the missing argument.
        argument: &'static str,
    },
    /// An argument that must be an integer is not one.
    #[error("`{value}` is not a valid {argument}")]
    InvalidNumber {
        /// Human description of the argument.
        argument: &'static str,
        /// Text that failed to parse.
        value: String,
    },
}
