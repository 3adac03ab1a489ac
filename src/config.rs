use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, VerbosityLevel};
use crate::error::{ConfigError, ConfigResult};
use crate::input::InputStructure;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub records: RecordsConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Input file configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InputConfig {
    /// File holding the XML documents
    pub path: Option<PathBuf>,
    /// How documents are packed into the file
    pub structure: Option<InputStructure>,
}

/// Output file configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputConfig {
    /// Destination for the tab-separated table
    pub path: Option<PathBuf>,
}

/// Record location configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecordsConfig {
    /// Candidate record paths, in priority order
    #[serde(default)]
    pub paths: Vec<String>,
    /// Namespace alias table used to resolve path prefixes
    #[serde(default)]
    pub namespaces: IndexMap<String, String>,
}

/// Reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ReportConfig {
    /// Verbose output
    #[serde(default)]
    pub verbose: bool,
    /// Quiet mode (failures only)
    #[serde(default)]
    pub quiet: bool,
}

impl Config {
    /// Input path; validated configurations always carry one.
    pub fn input_path(&self) -> ConfigResult<&Path> {
        self.input
            .path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "input".to_string(),
            })
    }

    /// Output path; validated configurations always carry one.
    pub fn output_path(&self) -> ConfigResult<&Path> {
        self.output
            .path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "output".to_string(),
            })
    }

    /// Input structure; validated configurations always carry one.
    pub fn structure(&self) -> ConfigResult<InputStructure> {
        self.input
            .structure
            .ok_or_else(|| ConfigError::MissingField {
                field: "structure".to_string(),
            })
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.report.quiet {
            VerbosityLevel::Quiet
        } else if self.report.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment
    /// -> CLI.
    pub fn load_config(cli: &Cli) -> ConfigResult<Config> {
        let mut config = Config::default();

        // Load from configuration file if specified
        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path)?;
            config = Self::merge_configs(config, file_config);
        } else {
            // Try to find configuration files in standard locations
            if let Some(found_config) = Self::find_config_file()? {
                config = Self::merge_configs(config, found_config);
            }
        }

        // Apply environment variable overrides
        config = Self::apply_environment_overrides(config)?;

        // Apply CLI argument overrides (highest precedence)
        config = Self::merge_with_cli(config, cli)?;

        // Validate the final configuration
        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a file (TOML or JSON)
    pub fn load_from_file(path: &Path) -> ConfigResult<Config> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let config: Config = toml::from_str(&content)?;
                Ok(config)
            }
            Some("json") => {
                let config: Config = serde_json::from_str(&content)?;
                Ok(config)
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat {
                extension: ext.to_string(),
            }),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(config) = toml::from_str::<Config>(&content) {
                    Ok(config)
                } else {
                    let config: Config = serde_json::from_str(&content)?;
                    Ok(config)
                }
            }
        }
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> ConfigResult<Option<Config>> {
        let config_names = [
            "flatten-xml.toml",
            "flatten-xml.json",
            ".flatten-xml.toml",
            ".flatten-xml.json",
        ];

        // Check current directory first
        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path)?));
            }
        }

        // Check user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("flatten-xml");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path)?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(config: Config) -> ConfigResult<Config> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, config)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut config: Config,
    ) -> ConfigResult<Config> {
        if let Some(input) = env.get("FLATTEN_XML_INPUT") {
            config.input.path = Some(PathBuf::from(input));
        }

        if let Some(output) = env.get("FLATTEN_XML_OUTPUT") {
            config.output.path = Some(PathBuf::from(output));
        }

        if let Some(structure) = env.get("FLATTEN_XML_STRUCTURE") {
            config.input.structure = Some(structure.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid FLATTEN_XML_STRUCTURE value: {}",
                    structure
                ))
            })?);
        }

        if let Some(verbose) = env.get("FLATTEN_XML_VERBOSE") {
            config.report.verbose = verbose.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid FLATTEN_XML_VERBOSE value: {}", verbose))
            })?;
        }

        if let Some(quiet) = env.get("FLATTEN_XML_QUIET") {
            config.report.quiet = quiet.parse().map_err(|_| {
                ConfigError::Environment(format!("Invalid FLATTEN_XML_QUIET value: {}", quiet))
            })?;
        }

        Ok(config)
    }

    /// Merge CLI arguments with configuration (CLI takes precedence)
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> ConfigResult<Config> {
        if let Some(input) = &cli.input {
            config.input.path = Some(input.clone());
        }
        if let Some(mode) = cli.mode {
            config.input.structure = Some(mode);
        }
        if let Some(output) = &cli.output {
            config.output.path = Some(output.clone());
        }
        if !cli.record_paths.is_empty() {
            config.records.paths = cli.record_paths.clone();
        }

        let cli_namespaces = cli
            .namespace_table()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "namespace".to_string(),
                value: cli.namespaces.join(","),
                reason,
            })?;
        if !cli_namespaces.is_empty() {
            config.records.namespaces = cli_namespaces;
        }

        if cli.verbose {
            config.report.verbose = true;
        }
        if cli.quiet {
            config.report.quiet = true;
        }

        Ok(config)
    }

    /// Merge two configurations (second takes precedence for set values)
    pub fn merge_configs(mut base: Config, override_config: Config) -> Config {
        if override_config.input.path.is_some() {
            base.input.path = override_config.input.path;
        }
        if override_config.input.structure.is_some() {
            base.input.structure = override_config.input.structure;
        }
        if override_config.output.path.is_some() {
            base.output.path = override_config.output.path;
        }
        if !override_config.records.paths.is_empty() {
            base.records.paths = override_config.records.paths;
        }
        if !override_config.records.namespaces.is_empty() {
            base.records.namespaces = override_config.records.namespaces;
        }
        if override_config.report.verbose {
            base.report.verbose = true;
        }
        if override_config.report.quiet {
            base.report.quiet = true;
        }

        base
    }

    /// Validate configuration values
    pub fn validate_config(config: &Config) -> ConfigResult<()> {
        if config.input.path.is_none() {
            return Err(ConfigError::MissingField {
                field: "input".to_string(),
            });
        }
        if config.input.structure.is_none() {
            return Err(ConfigError::MissingField {
                field: "structure".to_string(),
            });
        }
        if config.output.path.is_none() {
            return Err(ConfigError::MissingField {
                field: "output".to_string(),
            });
        }
        if config.records.paths.is_empty() {
            return Err(ConfigError::MissingField {
                field: "records.paths".to_string(),
            });
        }
        if config.records.namespaces.is_empty() {
            return Err(ConfigError::MissingField {
                field: "records.namespaces".to_string(),
            });
        }
        if config.report.verbose && config.report.quiet {
            return Err(ConfigError::MergeConflict {
                details: "verbose and quiet modes are mutually exclusive".to_string(),
            });
        }

        Ok(())
    }
}
