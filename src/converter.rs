//! End-to-end conversion: scaler source + feature order -> profile document

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ConverterConfig;
use crate::error::{ConvertError, Result};
use crate::feature_order::{read_feature_list, warn_duplicates};
use crate::profile::ScalingProfile;
use crate::source::{load_scaler, SourceFormat};
use crate::writer::{read_profile, write_profile_atomic, write_profile_checked};

/// One conversion to run.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Forces the source format instead of detecting it from the extension
    pub source_format: Option<SourceFormat>,
    /// Plain-text/CSV feature list. When absent the configured
    /// `feature_order` is used.
    pub feature_list: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            source_format: None,
            feature_list: None,
        }
    }

    pub fn with_feature_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.feature_list = Some(path.into());
        self
    }

    pub fn with_source_format(mut self, format: SourceFormat) -> Self {
        self.source_format = Some(format);
        self
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub destination: PathBuf,
    pub feature_count: usize,
    pub verified: bool,
}

/// Runs the single linear pipeline: load, build and validate, then write.
/// Nothing is written unless the profile is complete and valid.
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionReport> {
        self.config.validate()?;

        info!(source = %request.source.display(), "Loading scaler");
        let scaler = load_scaler(&request.source, request.source_format)?;
        debug!(
            mean_len = scaler.mean().len(),
            scale_len = scaler.scale().len(),
            "Scaler loaded"
        );

        let feature_order = self.feature_order(request.feature_list.as_deref())?;
        let profile =
            ScalingProfile::from_scaler(&scaler, feature_order, self.config.feature_count)?;
        info!(features = profile.feature_count(), "Profile validated");

        if self.config.verify {
            let expected = self.config.feature_count;
            write_profile_checked(&profile, &request.destination, self.config.pretty, |tmp| {
                verify_written(&profile, tmp, expected)?;
                debug!(tmp = %tmp.display(), "Profile verified before commit");
                Ok(())
            })?;
        } else {
            write_profile_atomic(&profile, &request.destination, self.config.pretty)?;
        }
        info!(destination = %request.destination.display(), "Profile written");

        Ok(ConversionReport {
            destination: request.destination.clone(),
            feature_count: profile.feature_count(),
            verified: self.config.verify,
        })
    }

    fn feature_order(&self, list: Option<&Path>) -> Result<Vec<String>> {
        match list {
            Some(path) => read_feature_list(path),
            None => {
                debug!(count = self.config.feature_order.len(), "Using configured feature order");
                warn_duplicates(&self.config.feature_order);
                Ok(self.config.feature_order.clone())
            }
        }
    }
}

/// Compare a written document with the in-memory profile, bit for bit.
fn verify_written(profile: &ScalingProfile, path: &Path, expected: usize) -> Result<()> {
    let written = read_profile(path)?;
    written.validate(expected)?;

    let same_bits = |a: &[f64], b: &[f64]| a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits());
    if !same_bits(written.mean(), profile.mean()) {
        return Err(ConvertError::VerifyMismatch("mean differs after read back".to_string()));
    }
    if !same_bits(written.scale(), profile.scale()) {
        return Err(ConvertError::VerifyMismatch("scale differs after read back".to_string()));
    }
    if written.feature_order() != profile.feature_order() {
        return Err(ConvertError::VerifyMismatch(
            "featureOrder differs after read back".to_string(),
        ));
    }
    Ok(())
}
