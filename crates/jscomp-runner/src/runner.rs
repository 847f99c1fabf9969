use tracing::{error, info};

use crate::compiler::Compiler;
use crate::exit_intercept::{ExitInterceptor, InterceptError};

/// Exit status treated as a failed compiler run.
const FAILURE_STATUS: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    CompletedWithErrors { errors: usize },
    /// The compiler asked to terminate the process with `status`.
    Exited { status: i32 },
}

impl RunOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::CompletedWithErrors { .. } => 1,
            RunOutcome::Exited { status } => status,
        }
    }
}

/// Runs `compiler` with exit interception in place for the duration of the
/// call. Failures are logged, not returned; the only error is finding another
/// interceptor already installed.
pub fn run_compiler<C: Compiler>(
    compiler: &mut C,
    args: &[String],
) -> Result<RunOutcome, InterceptError> {
    info!("{}", args_line(args));

    let outcome = {
        let interceptor = ExitInterceptor::install()?;
        compiler.disable_threads();
        interceptor.call(|| {
            if compiler.should_run(args) {
                compiler.run(args)
            } else {
                Default::default()
            }
        })
    };
    debug_assert!(!ExitInterceptor::is_installed());

    let outcome = match outcome {
        Ok(report) if report.has_errors() => {
            error!(errors = report.error_count, "Error running compiler");
            RunOutcome::CompletedWithErrors {
                errors: report.error_count,
            }
        }
        Ok(_) => RunOutcome::Completed,
        Err(request) => {
            if request.status == FAILURE_STATUS {
                error!("Error running compiler");
            }
            RunOutcome::Exited {
                status: request.status,
            }
        }
    };
    Ok(outcome)
}

fn args_line(args: &[String]) -> String {
    let mut line = String::from("Compiling with args:");
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
