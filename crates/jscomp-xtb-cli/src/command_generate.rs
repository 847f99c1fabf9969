use std::path::PathBuf;

use jscomp_tools_core::{
    BundleBuildError, MessageIdGenerator, MissingBasePolicy, PropertiesError, build_bundle,
    load_properties, write_bundle,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GenerateCommandError {
    #[error("generator was not configured; fix the arguments and retry")]
    NotRunnable,
    #[error(transparent)]
    Properties(#[from] PropertiesError),
    #[error(transparent)]
    Bundle(#[from] BundleBuildError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub source_path: PathBuf,
    pub target_path: PathBuf,
    pub base_path: PathBuf,
    pub lang: String,
    pub project_id: String,
    pub missing_base: MissingBasePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub entries: usize,
    pub target_path: PathBuf,
}

pub fn run_generate(options: &GenerateOptions) -> Result<GenerateSummary, GenerateCommandError> {
    let source = load_properties(&options.source_path)?;
    let base = load_properties(&options.base_path)?;
    debug!(
        source = %options.source_path.display(),
        base = %options.base_path.display(),
        source_keys = source.len(),
        base_keys = base.len(),
        "loaded properties"
    );

    let generator = MessageIdGenerator::new(options.project_id.as_str());
    let bundle = build_bundle(
        &source,
        &base,
        &generator,
        &options.lang,
        options.missing_base,
    )?;

    write_bundle(&options.target_path, &bundle).map_err(|source| GenerateCommandError::Write {
        path: options.target_path.clone(),
        source,
    })?;
    debug!(lang = %options.lang, "bundle written");

    Ok(GenerateSummary {
        entries: bundle.len(),
        target_path: options.target_path.clone(),
    })
}
