//! CLI configuration management
//!
//! Settings come from four layers. Priority (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (`MONTECARLO_*`)
//! 3. TOML config file
//! 4. Default values
//!
//! ```toml
//! iterations = 1000000
//! log_level = "info"
//! format = "table"
//!
//! [engine]
//! seed = 42
//! mode = "parallel"
//! workers = 8
//! streams = "offset"
//!
//! [engine.transform]
//! kind = "identity"
//! ```

use montecarlo_core::{EngineConfig, EngineError, ExecutionMode};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Environment variable overriding the base seed
pub const ENV_SEED: &str = "MONTECARLO_SEED";
/// Environment variable overriding the worker count
pub const ENV_WORKERS: &str = "MONTECARLO_WORKERS";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "MONTECARLO_LOG_LEVEL";
/// Environment variable overriding the iteration count
pub const ENV_ITERATIONS: &str = "MONTECARLO_ITERATIONS";

/// Default number of trials per run
pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Invalid iteration count: {0}. Must be at least 1")]
    InvalidIterations(u64),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Log levels accepted by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// Resolved CLI configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Trials per run
    pub iterations: u64,
    /// Log level
    pub log_level: LogLevel,
    /// Output format
    pub format: OutputFormat,
    /// Engine seed, execution mode, workers and transform
    pub engine: EngineConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            log_level: LogLevel::Info,
            format: OutputFormat::Table,
            engine: EngineConfig::default(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields for every variable `lookup` knows about
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut engine = self.engine.to_builder();

        if let Some(seed) = lookup(ENV_SEED) {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| ConfigError::EnvError(format!("{}={} is not a u64", ENV_SEED, seed)))?;
            engine = engine.seed(seed);
        }

        if let Some(workers) = lookup(ENV_WORKERS) {
            let workers = workers.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("{}={} is not a worker count", ENV_WORKERS, workers))
            })?;
            engine = engine.workers(workers);
        }

        if let Some(iterations) = lookup(ENV_ITERATIONS) {
            self.iterations = iterations.trim().parse().map_err(|_| {
                ConfigError::EnvError(format!("{}={} is not a u64", ENV_ITERATIONS, iterations))
            })?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }

        self.engine = engine.build()?;
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        let mut engine = self.engine.to_builder();

        if let Some(seed) = cli.seed {
            engine = engine.seed(seed);
        }
        if let Some(workers) = cli.workers {
            engine = engine.workers(workers);
        }
        if cli.parallel {
            engine = engine.mode(ExecutionMode::Parallel);
        }
        if let Some(iterations) = cli.iterations {
            self.iterations = iterations;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = LogLevel::from_str(level)?;
        }
        if let Some(format) = &cli.format {
            self.format = OutputFormat::from_str(format)?;
        }

        self.engine = engine.build()?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::InvalidIterations(self.iterations));
        }
        self.engine.validate()?;
        Ok(())
    }
}

/// CLI arguments relevant to configuration
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Trials per run
    pub iterations: Option<u64>,
    /// Base seed
    pub seed: Option<u64>,
    /// Worker threads
    pub workers: Option<usize>,
    /// Force parallel execution
    pub parallel: bool,
    /// Output format
    pub format: Option<String>,
    /// Log level
    pub log_level: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    build_config_with_env(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<CliConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use montecarlo_core::{StreamDerivation, TransformSpec, DEFAULT_SEED};
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.engine.seed(), DEFAULT_SEED);
        assert_eq!(config.engine.mode(), ExecutionMode::Sequential);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Warn").unwrap(), LogLevel::Warn);
        assert!(LogLevel::from_str("loud").is_err());
        assert_eq!(LogLevel::Error.to_string(), "error");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("table").unwrap(), OutputFormat::Table);
        assert!(matches!(
            OutputFormat::from_str("csv"),
            Err(ConfigError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_toml_deserialization() {
        let config = CliConfig::from_toml(
            r#"
            iterations = 5000
            log_level = "debug"
            format = "json"

            [engine]
            seed = 42
            mode = "parallel"
            workers = 3
            streams = "mixed"

            [engine.transform]
            kind = "indicator"
            threshold = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.iterations, 5000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.engine.seed(), 42);
        assert_eq!(config.engine.mode(), ExecutionMode::Parallel);
        assert_eq!(config.engine.workers(), 3);
        assert_eq!(config.engine.streams(), StreamDerivation::Mixed);
        assert_eq!(
            config.engine.transform(),
            &TransformSpec::Indicator {
                threshold: 0.5,
                greater_than: true
            }
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CliConfig::from_toml("iterations = 10").unwrap();
        assert_eq!(config.iterations, 10);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.engine.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(matches!(
            CliConfig::from_toml("iterations = 0"),
            Err(ConfigError::InvalidIterations(0))
        ));
    }

    #[test]
    fn test_bad_toml_is_file_error() {
        assert!(matches!(
            CliConfig::from_toml("iterations = \"many\""),
            Err(ConfigError::FileError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CliConfig::default();
        config
            .apply_env(env(&[
                (ENV_SEED, "7"),
                (ENV_WORKERS, " 5 "),
                (ENV_LOG_LEVEL, "warn"),
                (ENV_ITERATIONS, "1234"),
            ]))
            .unwrap();

        assert_eq!(config.engine.seed(), 7);
        assert_eq!(config.engine.workers(), 5);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.iterations, 1234);
    }

    #[test]
    fn test_env_parse_error() {
        let mut config = CliConfig::default();
        let err = config.apply_env(env(&[(ENV_SEED, "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
    }

    #[test]
    fn test_cli_args_merge() {
        let mut config = CliConfig::default();
        let cli = CliArgs {
            iterations: Some(99),
            seed: Some(3),
            workers: Some(2),
            parallel: true,
            format: Some("json".to_string()),
            log_level: Some("trace".to_string()),
            config_file: None,
        };

        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.iterations, 99);
        assert_eq!(config.engine.seed(), 3);
        assert_eq!(config.engine.workers(), 2);
        assert_eq!(config.engine.mode(), ExecutionMode::Parallel);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_level, LogLevel::Trace);
    }

    #[test]
    fn test_precedence_cli_over_env() {
        let cli = CliArgs {
            seed: Some(11),
            ..Default::default()
        };
        let config =
            build_config_with_env(&cli, env(&[(ENV_SEED, "22"), (ENV_WORKERS, "4")])).unwrap();

        assert_eq!(config.engine.seed(), 11);
        assert_eq!(config.engine.workers(), 4);
    }

    #[test]
    fn test_build_config_with_defaults() {
        let config = build_config_with_env(&CliArgs::default(), |_| None).unwrap();
        assert_eq!(config.iterations, DEFAULT_ITERATIONS);
        assert_eq!(config.engine.seed(), DEFAULT_SEED);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/montecarlo.toml")),
            ..Default::default()
        };
        assert!(matches!(
            build_config_with_env(&cli, |_| None),
            Err(ConfigError::FileError(_))
        ));
    }

    #[test]
    fn test_too_many_workers_rejected() {
        let cli = CliArgs {
            workers: Some(1_000_000),
            ..Default::default()
        };
        assert!(matches!(
            build_config_with_env(&cli, |_| None),
            Err(ConfigError::Engine(_))
        ));
    }
}
