#![forbid(unsafe_code)]

mod cli;
mod command_generate;
mod logging;

use tracing::{error, info};

use crate::cli::XtbGenerator;

fn main() {
    logging::init_logging();
    let generator = XtbGenerator::from_args(std::env::args().skip(1).collect());
    if !generator.is_runnable() {
        std::process::exit(-1);
    }
    match generator.run() {
        Ok(summary) => info!(
            entries = summary.entries,
            target = %summary.target_path.display(),
            "wrote translation bundle"
        ),
        Err(err) => {
            error!(error = %err, "failed to generate translation bundle");
            eprintln!("xtb-gen: {err}");
            std::process::exit(1);
        }
    }
}
