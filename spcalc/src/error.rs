use derive_more::From;

use spcalc_core::SpcalcError;

pub type Result<T> = core::result::Result<T, CliError>;

#[derive(Debug, From)]
pub enum CliError {
    // -- Externals
    #[from]
    Core(SpcalcError),

    #[from]
    Io(std::io::Error),

    #[from]
    Json(serde_json::Error),

    /// A required path was neither given on the command line nor answered at the prompt.
    MissingArgument(String),

    InvalidConfig(String),
}

// region:    --- Error Boilerplate

impl core::fmt::Display for CliError {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        match self {
            CliError::Core(err) => write!(fmt, "{err}"),
            CliError::Io(err) => write!(fmt, "{err}"),
            CliError::Json(err) => write!(fmt, "{err}"),
            CliError::MissingArgument(what) => write!(fmt, "No {what} was provided"),
            CliError::InvalidConfig(msg) => write!(fmt, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Core(err) => Some(err),
            CliError::Io(err) => Some(err),
            CliError::Json(err) => Some(err),
            CliError::MissingArgument(_) | CliError::InvalidConfig(_) => None,
        }
    }
}

// endregion: --- Error Boilerplate
