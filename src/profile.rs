//! Scaling profile: the interchange document consumed by inference runtimes

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::scalers::StandardScaler;

/// Per-feature standardization parameters paired with their feature names.
///
/// `scale` holds `1 / std` so a consumer standardizes with
/// `(x[i] - mean[i]) * scale[i]`. `feature_order[i]` names the feature the
/// statistics at index `i` belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScalingProfile {
    mean: Vec<f64>,
    scale: Vec<f64>,
    feature_order: Vec<String>,
}

impl ScalingProfile {
    /// Build a profile from a fitted scaler and the operator's feature order.
    ///
    /// Lengths are checked before anything else, in the order mean, scale,
    /// feature order. Every output value must be finite.
    pub fn from_scaler(
        scaler: &StandardScaler,
        feature_order: Vec<String>,
        expected: usize,
    ) -> Result<Self> {
        check_len("mean", scaler.mean().len(), expected)?;
        check_len("scale", scaler.scale().len(), expected)?;
        check_len("featureOrder", feature_order.len(), expected)?;

        if let Some((index, &value)) = scaler
            .mean()
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ConvertError::NonFiniteParameter { field: "mean", index, value });
        }

        let scale = scaler.inverse_scale();
        for (index, (&inverted, &std_dev)) in scale.iter().zip(scaler.scale()).enumerate() {
            // 1/inf is finite but loses the source value
            if !inverted.is_finite() || !std_dev.is_finite() {
                return Err(ConvertError::NonFiniteParameter {
                    field: "scale",
                    index,
                    value: std_dev,
                });
            }
        }

        Ok(ScalingProfile {
            mean: scaler.mean().to_vec(),
            scale,
            feature_order,
        })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Inverted standard deviations
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    pub fn feature_order(&self) -> &[String] {
        &self.feature_order
    }

    pub fn feature_count(&self) -> usize {
        self.feature_order.len()
    }

    /// Re-check the arity of a profile obtained from elsewhere, e.g. read
    /// back from disk.
    pub fn validate(&self, expected: usize) -> Result<()> {
        check_len("mean", self.mean.len(), expected)?;
        check_len("scale", self.scale.len(), expected)?;
        check_len("featureOrder", self.feature_order.len(), expected)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn check_len(field: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(ConvertError::ShapeMismatch { field, expected, actual });
    }
    Ok(())
}
