use std::collections::BTreeMap;
use std::process::{Command, ExitStatus};

use tracing::{debug, error};

use crate::config::CompilerSettings;
use crate::exit_intercept::request_exit;

/// Status a JVM reports on Unix after `System.exit(-1)`.
const WRAPPED_FAILURE_STATUS: i32 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompileReport {
    pub error_count: usize,
}

impl CompileReport {
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// An external compiler entry point. Implementations may end a run early
/// through [`request_exit`].
pub trait Compiler {
    /// Keeps the compiler on the calling thread.
    fn disable_threads(&mut self);

    /// False when the arguments already told the compiler not to compile.
    fn should_run(&self, _args: &[String]) -> bool {
        true
    }

    fn run(&mut self, args: &[String]) -> CompileReport;
}

/// Runs the compiler as a child process and waits for it.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    settings: CompilerSettings,
    env: BTreeMap<String, String>,
}

impl ProcessCompiler {
    pub fn new(settings: CompilerSettings) -> Self {
        Self {
            settings,
            env: BTreeMap::new(),
        }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.settings.program);
        command.args(&self.settings.args).args(args).envs(&self.env);
        command
    }
}

impl Compiler for ProcessCompiler {
    fn disable_threads(&mut self) {
        self.env.extend(
            self.settings
                .single_thread_env
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    fn run(&mut self, args: &[String]) -> CompileReport {
        debug!(program = %self.settings.program, "starting compiler");
        let status = match self.command(args).status() {
            Ok(status) => status,
            Err(err) => {
                error!(program = %self.settings.program, error = %err, "failed to start compiler");
                request_exit(-1)
            }
        };
        match exit_code(status) {
            Some(0) => CompileReport::default(),
            Some(code) => request_exit(code),
            None => {
                error!(%status, "compiler terminated without an exit code");
                request_exit(-1)
            }
        }
    }
}

fn exit_code(status: ExitStatus) -> Option<i32> {
    status.code().map(|code| match code {
        WRAPPED_FAILURE_STATUS => -1,
        other => other,
    })
}
