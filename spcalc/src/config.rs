use std::path::PathBuf;

use clap::Parser;
use spcalc_core::Operation;

use crate::error::{CliError, Result};

/// Add, subtract and multiply sparse integer matrices stored as text files.
///
/// Without `--op` the calculator runs an interactive menu; missing paths are prompted for.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path of the first matrix file
    #[arg(env = "SPCALC_FIRST")]
    pub first: Option<PathBuf>,

    /// Path of the second matrix file
    #[arg(env = "SPCALC_SECOND")]
    pub second: Option<PathBuf>,

    /// Where to write the report (stdout in batch mode if omitted)
    #[arg(short, long, env = "SPCALC_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Operation to run without the menu (add, subtract, multiply); repeatable
    #[arg(long = "op", value_name = "OP")]
    pub operations: Vec<Operation>,

    /// Drop zero-valued entries from results before reporting them
    #[arg(long, env = "SPCALC_PRUNE_ZEROS")]
    pub prune_zeros: bool,

    /// Write the report as JSON instead of text
    #[arg(long, env = "SPCALC_JSON")]
    pub json: bool,

    /// Write the last result as a matrix file (header included) instead of a report
    #[arg(long, requires = "operations")]
    pub emit_matrix: bool,
}

/// Everything a [`crate::session::Session`] needs to know.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    pub first: Option<PathBuf>,
    pub second: Option<PathBuf>,
    pub output: Option<PathBuf>,
    /// Empty means interactive mode.
    pub operations: Vec<Operation>,
    pub prune_zeros: bool,
    pub json: bool,
    pub emit_matrix: bool,
}

impl RunConfig {
    pub fn is_interactive(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.emit_matrix && self.is_interactive() {
            return Err(CliError::InvalidConfig(
                "--emit-matrix needs at least one --op".to_string(),
            ));
        }
        if self.emit_matrix && self.json {
            return Err(CliError::InvalidConfig(
                "--emit-matrix and --json cannot be combined".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        RunConfig {
            first: cli.first,
            second: cli.second,
            output: cli.output,
            operations: cli.operations,
            prune_zeros: cli.prune_zeros,
            json: cli.json,
            emit_matrix: cli.emit_matrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_batch_arguments() {
        let cli = Cli::try_parse_from([
            "spcalc", "a.txt", "b.txt", "-o", "out.txt", "--op", "add", "--op", "3",
            "--prune-zeros",
        ])
        .unwrap();
        let config = RunConfig::from(cli);
        assert_eq!(config.first, Some(PathBuf::from("a.txt")));
        assert_eq!(config.second, Some(PathBuf::from("b.txt")));
        assert_eq!(config.output, Some(PathBuf::from("out.txt")));
        assert_eq!(config.operations, vec![Operation::Add, Operation::Multiply]);
        assert!(config.prune_zeros);
        assert!(!config.is_interactive());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_rejects_unknown_operation() {
        assert!(Cli::try_parse_from(["spcalc", "--op", "divide"]).is_err());
    }

    #[test]
    fn test_emit_matrix_needs_operation() {
        assert!(Cli::try_parse_from(["spcalc", "a.txt", "b.txt", "--emit-matrix"]).is_err());

        let config = RunConfig {
            emit_matrix: true,
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(CliError::InvalidConfig(_))));
    }
}
