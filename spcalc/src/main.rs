use std::{error::Error, io, process::ExitCode};

use clap::Parser;
use spcalc::{Cli, RunConfig, Session};

fn main() -> Result<ExitCode, Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RunConfig::from(Cli::parse());
    config.validate()?;
    log::debug!("Starting with {:?}", config);

    let session = Session::new(config, io::stdin().lock(), io::stdout().lock());
    match session.run() {
        Ok(report) => {
            log::debug!("Session finished with {} result(s)", report.results().len());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            log::error!("Session failed: {:?}", e);
            println!("An error occurred: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}
