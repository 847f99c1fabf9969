use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::RunnerError;

pub const CONFIG_ENV_VAR: &str = "JSCOMP_RUNNER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "jscomp-runner.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub compiler: CompilerSettings,
}

/// How to launch the external compiler. Forwarded arguments follow `args`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompilerSettings {
    pub program: String,
    pub args: Vec<String>,
    /// Environment applied when the compiler is told to stay on one thread.
    pub single_thread_env: BTreeMap<String, String>,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        let mut single_thread_env = BTreeMap::new();
        single_thread_env.insert(
            "JAVA_TOOL_OPTIONS".to_string(),
            "-XX:ActiveProcessorCount=1".to_string(),
        );
        Self {
            program: "google-closure-compiler".to_string(),
            args: Vec::new(),
            single_thread_env,
        }
    }
}

pub fn config_path_from_env() -> PathBuf {
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn load_config(path: &Path) -> Result<RunnerConfig, RunnerError> {
    let contents = fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

pub fn load_config_or_default(path: &Path) -> Result<RunnerConfig, RunnerError> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(RunnerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{CompilerSettings, load_config_or_default};
    use crate::error::RunnerError;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        path.push(format!("jscomp_runner_{name}_{nanos}.toml"));
        path
    }

    #[test]
    fn uses_default_when_missing() {
        let path = temp_path("missing");
        let config = load_config_or_default(&path).expect("config");
        assert_eq!(config.compiler.program, "google-closure-compiler");
        assert!(config.compiler.args.is_empty());
    }

    #[test]
    fn loads_from_file() {
        let path = temp_path("config");
        let contents = r#"
[compiler]
program = "java"
args = ["-jar", "closure-compiler.jar"]

[compiler.single_thread_env]
JAVA_TOOL_OPTIONS = "-XX:ActiveProcessorCount=1 -Xss8m"
"#;
        fs::write(&path, contents).expect("write");
        let config = load_config_or_default(&path).expect("config");
        assert_eq!(config.compiler.program, "java");
        assert_eq!(config.compiler.args, vec!["-jar", "closure-compiler.jar"]);
        assert_eq!(
            config.compiler.single_thread_env.get("JAVA_TOOL_OPTIONS").map(String::as_str),
            Some("-XX:ActiveProcessorCount=1 -Xss8m")
        );
        fs::remove_file(&path).ok();
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let path = temp_path("partial");
        fs::write(&path, "[compiler]\nargs = [\"--jscomp_warning=lintChecks\"]\n").expect("write");
        let config = load_config_or_default(&path).expect("config");
        assert_eq!(config.compiler.program, "google-closure-compiler");
        assert_eq!(config.compiler.args.len(), 1);
        assert!(config.compiler.single_thread_env.contains_key("JAVA_TOOL_OPTIONS"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_malformed_file() {
        let path = temp_path("malformed");
        fs::write(&path, "[compiler\nprogram = 1").expect("write");
        let err = load_config_or_default(&path).expect_err("malformed");
        assert!(matches!(err, RunnerError::Toml(_)));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn default_single_thread_env_limits_processors() {
        let settings = CompilerSettings::default();
        assert_eq!(
            settings.single_thread_env.get("JAVA_TOOL_OPTIONS").map(String::as_str),
            Some("-XX:ActiveProcessorCount=1")
        );
    }
}
