//! Configuration management for disync
//!
//! Loads `config.toml` with `DISYNC_*` environment overrides and validates
//! the result before anything is started.

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Which front end serves the namespace
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frontend {
    /// Line protocol over TCP, one session per connection
    #[default]
    Tcp,
    /// Interactive prompt on stdin/stdout
    Console,
}

/// Complete process configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK (Environment Override Supported) ═══
    /// IP address to bind the command listener
    pub bind_address: String,

    /// Port for the command listener
    pub control_port: u16,

    /// Maximum concurrent sessions
    pub max_clients: usize,

    /// Maximum length of one input line
    pub max_command_length: usize,

    // ═══ NAMESPACE ═══
    /// YAML/JSON document the namespace is built from
    pub namespace_file: String,

    /// Skip unrecognised document entries instead of refusing to start
    pub allow_corrupt: bool,

    pub frontend: Frontend,
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Try installed path first, then development path
        let config_paths = ["disync/config", "config"];

        let mut last_error = None;

        for config_path in config_paths {
            match Self::builder()?
                .add_source(File::with_name(config_path))
                .add_source(Self::environment())
                .build()
            {
                Ok(settings) => {
                    let config: ServerConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            config::ConfigError::Message(format!(
                "Failed to load config from any location. Tried: {config_paths:?}"
            ))
        }))
    }

    /// Load configuration from an explicit file, still honouring environment overrides
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let settings = Self::builder()?
            .add_source(File::from(path))
            .add_source(Self::environment())
            .build()?;
        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        Config::builder()
            .set_default("bind_address", "127.0.0.1")?
            .set_default("control_port", 2121)?
            .set_default("max_clients", 10)?
            .set_default("max_command_length", 512)?
            .set_default("namespace_file", "namespace.yaml")?
            .set_default("allow_corrupt", false)?
            .set_default("frontend", "tcp")
    }

    fn environment() -> Environment {
        Environment::with_prefix("DISYNC").try_parsing(true)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.control_port == 0 {
            return Err(config::ConfigError::Message(
                "Control port cannot be 0".into(),
            ));
        }

        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        if self.namespace_file.is_empty() {
            return Err(config::ConfigError::Message(
                "namespace_file cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and control port as socket address
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    /// Get the namespace document as PathBuf
    pub fn namespace_path(&self) -> PathBuf {
        PathBuf::from(&self.namespace_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let file = write_config("namespace_file = \"tree.yaml\"\n");
        let config = ServerConfig::from_file(file.path()).unwrap();

        assert_eq!(config.control_socket(), "127.0.0.1:2121");
        assert_eq!(config.max_clients, 10);
        assert_eq!(config.namespace_path(), PathBuf::from("tree.yaml"));
        assert!(!config.allow_corrupt);
        assert_eq!(config.frontend, Frontend::Tcp);
    }

    #[test]
    fn test_explicit_values() {
        let file = write_config(
            "bind_address = \"0.0.0.0\"\ncontrol_port = 4000\nallow_corrupt = true\nfrontend = \"console\"\n",
        );
        let config = ServerConfig::from_file(file.path()).unwrap();

        assert_eq!(config.control_socket(), "0.0.0.0:4000");
        assert!(config.allow_corrupt);
        assert_eq!(config.frontend, Frontend::Console);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        for contents in [
            "control_port = 0\n",
            "max_clients = 0\n",
            "max_command_length = 0\n",
            "namespace_file = \"\"\n",
        ] {
            let file = write_config(contents);
            assert!(ServerConfig::from_file(file.path()).is_err(), "{contents}");
        }
    }
}
