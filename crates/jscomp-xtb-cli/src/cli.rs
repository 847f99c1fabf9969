use std::path::PathBuf;

use jscomp_tools_core::MissingBasePolicy;
use thiserror::Error;

use crate::command_generate::{
    GenerateCommandError, GenerateOptions, GenerateSummary, run_generate,
};

#[derive(Debug, Error)]
pub enum CliAppError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Generate(#[from] GenerateCommandError),
}

/// Generator configured from command-line arguments. Argument errors are
/// reported on stderr at construction; such a generator is not runnable.
#[derive(Debug)]
pub struct XtbGenerator {
    options: Option<GenerateOptions>,
}

impl XtbGenerator {
    pub fn from_args(args: Vec<String>) -> Self {
        match parse_generate_options(args) {
            Ok(options) => Self {
                options: Some(options),
            },
            Err(err) => {
                eprintln!("{err}");
                Self { options: None }
            }
        }
    }

    pub fn is_runnable(&self) -> bool {
        self.options.is_some()
    }

    pub fn run(&self) -> Result<GenerateSummary, CliAppError> {
        let options = self
            .options
            .as_ref()
            .ok_or(GenerateCommandError::NotRunnable)?;
        Ok(run_generate(options)?)
    }
}

fn parse_generate_options(args: Vec<String>) -> Result<GenerateOptions, CliAppError> {
    let mut source_path = None;
    let mut target_path = None;
    let mut base_path = None;
    let mut lang = None;
    let mut project_id = None;
    let mut missing_base = MissingBasePolicy::Fail;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--source" => source_path = Some(PathBuf::from(next_value("--source", &mut iter)?)),
            "--target" => target_path = Some(PathBuf::from(next_value("--target", &mut iter)?)),
            "--base" => base_path = Some(PathBuf::from(next_value("--base", &mut iter)?)),
            "--lang" => lang = Some(next_value("--lang", &mut iter)?),
            "--project" => project_id = Some(next_value("--project", &mut iter)?),
            "--allow-missing-base" => missing_base = MissingBasePolicy::UseNullText,
            "--help" | "-h" => return Err(CliAppError::Usage(usage())),
            other => {
                return Err(CliAppError::Usage(format!(
                    "unknown option {other}\n\n{}",
                    usage()
                )));
            }
        }
    }

    Ok(GenerateOptions {
        source_path: required("--source", source_path)?,
        target_path: required("--target", target_path)?,
        base_path: required("--base", base_path)?,
        lang: required("--lang", lang)?,
        project_id: required("--project", project_id)?,
        missing_base,
    })
}

fn required<T>(flag: &str, value: Option<T>) -> Result<T, CliAppError> {
    value.ok_or_else(|| CliAppError::Usage(format!("option {flag} is required\n\n{}", usage())))
}

fn next_value(flag: &str, iter: &mut impl Iterator<Item = String>) -> Result<String, CliAppError> {
    iter.next()
        .ok_or_else(|| CliAppError::Usage(format!("{flag} requires a value\n\n{}", usage())))
}

fn usage() -> String {
    "usage: xtb-gen --source <path> --target <path> --base <path> --lang <tag> --project <id> [--allow-missing-base]\n\
     \n\
     \x20 --source <path>        translated messages in .properties format\n\
     \x20 --target <path>        translation bundle to write in .xtb format\n\
     \x20 --base <path>          original messages in .properties format, same keys as --source;\n\
     \x20                        their text and meanings produce the message ids\n\
     \x20 --lang <tag>           language of the translations\n\
     \x20 --project <id>         project id used to scope message ids\n\
     \x20 --allow-missing-base   compute ids of keys absent from --base over the text \"null\"\n\
     \x20                        instead of failing"
        .to_string()
}
