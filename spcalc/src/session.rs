use std::{
    fs,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use spcalc_core::{
    format, format_with_header, read_matrix, Computation, MatrixDimensions, Operation,
    ParsedMatrix, SparseMatrix,
};

use crate::{
    config::RunConfig,
    error::{CliError, Result},
    report::Report,
};

/// Menu number of the Exit entry, after every operation.
const EXIT_CHOICE: usize = Operation::ALL.len() + 1;

fn menu() -> String {
    let mut menu = String::from("\nChoose an operation:\n");
    for op in Operation::ALL {
        menu.push_str(&format!("{}. {}\n", op.menu_number(), op.menu_text()));
    }
    menu.push_str(&format!("{EXIT_CHOICE}. Exit"));
    menu
}

/// One run of the calculator: load two matrices, compute, write the report.
///
/// Prompts are read from `input` and everything meant for the user goes to `console`,
/// so the whole workflow can be driven from memory in tests.
pub struct Session<R, W> {
    config: RunConfig,
    input: R,
    console: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(config: RunConfig, input: R, console: W) -> Self {
        Self {
            config,
            input,
            console,
        }
    }

    /// Runs the session to completion and returns the report that was written.
    pub fn run(mut self) -> Result<Report> {
        let first = self.path_or_prompt(
            self.config.first.clone(),
            "first matrix path",
            "Enter the path for the first matrix file: ",
        )?;
        let second = self.path_or_prompt(
            self.config.second.clone(),
            "second matrix path",
            "Enter the path for the second matrix file: ",
        )?;
        let output = if self.config.is_interactive() {
            Some(self.path_or_prompt(
                self.config.output.clone(),
                "output path",
                "Enter the path for the output file: ",
            )?)
        } else {
            self.config.output.clone()
        };

        writeln!(self.console, "Reading matrix from {}", first.display())?;
        writeln!(self.console, "Reading matrix from {}", second.display())?;
        let a = self.load(&first)?;
        let b = self.load(&second)?;

        let mut report = Report::new();
        report.push(format!("Matrix 1 ({})", first.display()), a.matrix.clone());
        report.push(format!("Matrix 2 ({})", second.display()), b.matrix.clone());

        if self.config.is_interactive() {
            self.menu_loop(&a.matrix, &b.matrix, &mut report)?;
        } else {
            for op in self.config.operations.clone() {
                let result = self.compute(op, &a.matrix, &b.matrix)?;
                log::info!("{} computed, {} entries", op.label(), result.nnz());
                report.push(op.label(), result);
            }
        }

        let content = self.render(&report, &a, &b)?;
        match output {
            Some(path) => {
                fs::write(&path, content)?;
                log::info!("Report written to {}", path.display());
                writeln!(self.console, "Output saved to {}", path.display())?;
            }
            None => write!(self.console, "{content}")?,
        }
        self.console.flush()?;
        Ok(report)
    }

    fn menu_loop(
        &mut self,
        a: &SparseMatrix,
        b: &SparseMatrix,
        report: &mut Report,
    ) -> Result<()> {
        let menu = menu();
        loop {
            writeln!(self.console, "{menu}")?;
            let Some(choice) = self.prompt("Enter your choice: ")? else {
                log::debug!("Input closed, leaving the menu");
                break;
            };
            if choice == EXIT_CHOICE.to_string() {
                writeln!(self.console, "Exiting...")?;
                break;
            }
            let Ok(op) = choice.parse::<Operation>() else {
                writeln!(
                    self.console,
                    "Invalid choice. Please choose a number from 1 to {EXIT_CHOICE}."
                )?;
                continue;
            };
            let result = self.compute(op, a, b)?;
            writeln!(self.console, "{}:", op.label())?;
            writeln!(self.console, "{}", format(&result))?;
            report.push(op.label(), result);
        }
        Ok(())
    }

    fn compute(
        &mut self,
        op: Operation,
        a: &SparseMatrix,
        b: &SparseMatrix,
    ) -> Result<SparseMatrix> {
        let Computation { matrix, overflows } = op.compute(a, b);
        if !overflows.is_empty() {
            writeln!(
                self.console,
                "{}: overflow in {} entr{}, values saturated",
                op.label(),
                overflows.len(),
                if overflows.len() == 1 { "y" } else { "ies" }
            )?;
        }
        Ok(if self.config.prune_zeros {
            matrix.pruned()
        } else {
            matrix
        })
    }

    fn render(&self, report: &Report, a: &ParsedMatrix, b: &ParsedMatrix) -> Result<String> {
        if self.config.emit_matrix {
            let (Some(op), Some(last)) = (self.config.operations.last(), report.results().last())
            else {
                return Err(CliError::InvalidConfig(
                    "--emit-matrix needs at least one --op".to_string(),
                ));
            };
            return Ok(format_with_header(
                &last.matrix,
                result_dims(*op, a.dims, b.dims),
            ));
        }
        if self.config.json {
            return Ok(report.to_json()?);
        }
        Ok(report.to_text())
    }

    fn load(&mut self, path: &Path) -> Result<ParsedMatrix> {
        let parsed = read_matrix(path)?;
        if !parsed.warnings.is_empty() {
            writeln!(
                self.console,
                "Skipped {} malformed line(s) in {}",
                parsed.warnings.len(),
                path.display()
            )?;
        }
        log::debug!(
            "Loaded {} ({} declared, {} entries)",
            path.display(),
            parsed.dims,
            parsed.matrix.nnz()
        );
        Ok(parsed)
    }

    fn path_or_prompt(
        &mut self,
        given: Option<PathBuf>,
        what: &str,
        question: &str,
    ) -> Result<PathBuf> {
        if let Some(path) = given {
            return Ok(path);
        }
        match self.prompt(question)? {
            Some(answer) if !answer.is_empty() => Ok(PathBuf::from(answer)),
            _ => Err(CliError::MissingArgument(what.to_string())),
        }
    }

    /// Asks `question` and returns the trimmed answer, or `None` once input is exhausted.
    fn prompt(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.console, "{question}")?;
        self.console.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Declared size of an operation's result, for documents written with `--emit-matrix`.
pub fn result_dims(op: Operation, a: MatrixDimensions, b: MatrixDimensions) -> MatrixDimensions {
    match op {
        Operation::Add | Operation::Subtract => {
            MatrixDimensions::new(a.rows.max(b.rows), a.cols.max(b.cols))
        }
        Operation::Multiply => MatrixDimensions::new(a.rows, b.cols),
    }
}
