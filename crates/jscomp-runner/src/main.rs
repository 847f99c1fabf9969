#![forbid(unsafe_code)]

mod compiler;
mod config;
mod error;
mod exit_intercept;
mod logging;
mod runner;

use tracing::error;

use crate::compiler::ProcessCompiler;
use crate::config::{config_path_from_env, load_config_or_default};
use crate::error::RunnerError;
use crate::runner::run_compiler;

fn main() {
    logging::init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let code = match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "compiler runner failed");
            eprintln!("jscomp-runner: {err}");
            1
        }
    };
    std::process::exit(code);
}

fn run(args: &[String]) -> Result<i32, RunnerError> {
    let config_path = config_path_from_env();
    let config = load_config_or_default(&config_path)?;
    let mut compiler = ProcessCompiler::new(config.compiler);
    let outcome = run_compiler(&mut compiler, args)?;
    Ok(outcome.exit_code())
}
