//! Error types for the console binary.
//!
//! Every failure that ends a session is a [`CliError`]; `main` prints it and
//! exits with [`CliError::exit_code`].

use std::process::ExitCode;

use tabula_sqlite::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that terminate the console.
#[derive(Debug, Error)]
pub enum CliError {
    /// The command line did not parse; clap's message includes the usage.
    #[error("{0}")]
    Usage(clap::Error),

    /// No store name was given.
    #[error("No Database Selected")]
    NoDatabase,

    /// More than one positional argument was given.
    #[error("More Than One Argument Passed")]
    TooManyArguments,

    /// The store file could not be opened or created.
    #[error("Database did NOT load: {0}")]
    Open(#[source] StoreError),

    /// The configuration file is unreadable or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The log subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// The working directory, which anchors store and config paths, is
    /// unreadable.
    #[error("cannot read the working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    /// Reading keys or writing to the terminal failed mid-session.
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status for this error class.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    /// Numeric exit status: 2 no store, 3 extra arguments, 4 open failure,
    /// 5 configuration or logging setup, 6 terminal I/O, 7 command-line
    /// usage, 8 unreadable working directory.
    pub fn code(&self) -> u8 {
        match self {
            Self::NoDatabase => 2,
            Self::TooManyArguments => 3,
            Self::Open(_) => 4,
            Self::Config(_) | Self::Logging(_) => 5,
            Self::Terminal(_) => 6,
            Self::Usage(_) => 7,
            Self::WorkingDir(_) => 8,
        }
    }
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_per_class() {
        let errors = [
            CliError::NoDatabase,
            CliError::TooManyArguments,
            CliError::Open(StoreError::MissingTable),
            CliError::Config(ConfigError::Invalid("x".into())),
            CliError::Terminal(std::io::Error::other("tty gone")),
            CliError::Usage(clap::Error::new(clap::error::ErrorKind::UnknownArgument)),
            CliError::WorkingDir(std::io::Error::other("cwd removed")),
        ];
        let mut codes: Vec<u8> = errors.iter().map(CliError::code).collect();
        codes.dedup();
        assert_eq!(codes, vec![2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_working_dir_is_not_a_terminal_error() {
        let err = CliError::WorkingDir(std::io::Error::other("cwd removed"));
        assert_eq!(err.code(), 8);
        assert_eq!(
            err.to_string(),
            "cannot read the working directory: cwd removed"
        );
    }

    #[test]
    fn test_diagnostic_text() {
        assert_eq!(CliError::NoDatabase.to_string(), "No Database Selected");
        assert_eq!(
            CliError::TooManyArguments.to_string(),
            "More Than One Argument Passed"
        );
        assert!(
            CliError::Open(StoreError::MissingTable)
                .to_string()
                .starts_with("Database did NOT load: ")
        );
    }
}
