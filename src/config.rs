//! Converter configuration

use std::path::Path;

use ::config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ConvertError, Result};

/// Number of features the on-device model is fitted with.
pub const FEATURE_COUNT: usize = 100;

/// Prefix of environment variables overriding file values,
/// e.g. `SCALER_CONVERT_FEATURE_ORDER=speed,rpm,load`.
pub const ENV_PREFIX: &str = "SCALER_CONVERT";

/// Converter settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConverterConfig {
    /// Expected length of mean, scale and feature order. Never read from a
    /// file or the environment; the binary always uses `FEATURE_COUNT`.
    #[serde(skip_deserializing, default = "default_feature_count")]
    pub feature_count: usize,
    /// Feature names in the order used when fitting the scaler
    #[serde(default)]
    pub feature_order: Vec<String>,
    /// Pretty print the output document
    #[serde(default)]
    pub pretty: bool,
    /// Read the written document back and compare it
    #[serde(default)]
    pub verify: bool,
}

fn default_feature_count() -> usize {
    FEATURE_COUNT
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            feature_count: FEATURE_COUNT,
            feature_order: Vec::new(),
            pretty: false,
            verify: false,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from an optional file (TOML, JSON or YAML by
    /// extension), with `SCALER_CONVERT_*` environment variables on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config: ConverterConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("feature_order"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_count == 0 {
            return Err(ConvertError::Config(
                "feature_count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
