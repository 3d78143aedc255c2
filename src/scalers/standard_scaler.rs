use serde::Deserialize;

/// Fitted state of a standard (z-score) scaler as exported from training.
///
/// Field names follow the trained object's attribute names. Any other
/// attributes in the source mapping are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StandardScaler {
    #[serde(rename = "mean_")]
    mean: Vec<f64>,
    #[serde(rename = "scale_")]
    scale: Vec<f64>,
    #[serde(rename = "n_features_in_", default)]
    n_features_in: Option<usize>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        StandardScaler { mean, scale, n_features_in: None }
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-feature standard deviations, as fitted.
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Feature count recorded by the trainer, when the source carries it.
    pub fn n_features_in(&self) -> Option<usize> {
        self.n_features_in
    }

    /// Reciprocal of every standard deviation, so `(x - mean) * inv` replaces
    /// `(x - mean) / std` downstream.
    pub fn inverse_scale(&self) -> Vec<f64> {
        self.scale.iter().map(|&std_dev| 1.0 / std_dev).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_scale() {
        let scaler = StandardScaler::new(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 0.5]);
        assert_eq!(scaler.inverse_scale(), vec![0.5, 0.25, 2.0]);
    }

    #[test]
    fn test_inverse_of_zero_is_infinite() {
        let scaler = StandardScaler::new(vec![0.0], vec![0.0]);
        assert!(scaler.inverse_scale()[0].is_infinite());
    }

    #[test]
    fn test_deserialize_ignores_extra_attributes() {
        let json = r#"{
            "mean_": [0.5, 1.5],
            "scale_": [1.0, 2.0],
            "var_": [1.0, 4.0],
            "with_mean": true,
            "n_features_in_": 2
        }"#;
        let scaler: StandardScaler = serde_json::from_str(json).unwrap();
        assert_eq!(scaler.mean(), &[0.5, 1.5]);
        assert_eq!(scaler.scale(), &[1.0, 2.0]);
        assert_eq!(scaler.n_features_in(), Some(2));
    }

    #[test]
    fn test_deserialize_requires_scale() {
        let json = r#"{ "mean_": [0.5, 1.5] }"#;
        assert!(serde_json::from_str::<StandardScaler>(json).is_err());
    }
}
