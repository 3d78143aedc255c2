//! Loading the fitted scaler from its serialized source file

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use serde_pickle::DeOptions;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::scalers::StandardScaler;

/// Serialization format of the source scaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Python pickle of a mapping holding `mean_` and `scale_` lists
    Pickle,
    /// JSON object holding `mean_` and `scale_` arrays
    Json,
}

impl SourceFormat {
    /// Pick the format from the file extension. Anything that is not JSON is
    /// treated as a pickle.
    pub fn detect(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => SourceFormat::Json,
            _ => SourceFormat::Pickle,
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pickle" | "pkl" => Ok(SourceFormat::Pickle),
            "json" => Ok(SourceFormat::Json),
            other => Err(format!("unknown source format '{}'", other)),
        }
    }
}

/// Read and decode a fitted scaler from `path`.
///
/// `format` overrides extension based detection when given.
pub fn load_scaler(path: &Path, format: Option<SourceFormat>) -> Result<StandardScaler> {
    let format = format.unwrap_or_else(|| SourceFormat::detect(path));
    debug!(path = %path.display(), ?format, "Opening scaler source");

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return Err(source_error(path, e.to_string())),
    };
    let reader = BufReader::new(file);

    let scaler: StandardScaler = match format {
        SourceFormat::Pickle => {
            // numpy reconstructors and estimator classes cannot be resolved
            // here; they decode to None and only fail if mean_/scale_ need them
            let options = DeOptions::new().replace_unresolved_globals();
            serde_pickle::from_reader(reader, options).map_err(|e| {
                source_error(
                    path,
                    format!(
                        "{} (the pickle must hold a mapping with plain lists under \
                         'mean_' and 'scale_', e.g. arrays converted with .tolist())",
                        e
                    ),
                )
            })?
        }
        SourceFormat::Json => {
            serde_json::from_reader(reader).map_err(|e| source_error(path, e.to_string()))?
        }
    };

    if let Some(n) = scaler.n_features_in() {
        if n != scaler.mean().len() {
            warn!(
                n_features_in = n,
                mean_len = scaler.mean().len(),
                "Scaler reports a different feature count than its mean vector"
            );
        }
    }

    Ok(scaler)
}

fn source_error(path: &Path, reason: String) -> ConvertError {
    ConvertError::SourceRead {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_pickle::SerOptions;

    #[derive(Serialize)]
    struct PickledScaler {
        mean_: Vec<f64>,
        scale_: Vec<f64>,
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(SourceFormat::detect(Path::new("a/scaler.json")), SourceFormat::Json);
        assert_eq!(SourceFormat::detect(Path::new("a/scaler.JSON")), SourceFormat::Json);
        assert_eq!(SourceFormat::detect(Path::new("feature_scaler.pkl")), SourceFormat::Pickle);
        assert_eq!(SourceFormat::detect(Path::new("scaler")), SourceFormat::Pickle);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("Pickle".parse::<SourceFormat>(), Ok(SourceFormat::Pickle));
        assert_eq!("json".parse::<SourceFormat>(), Ok(SourceFormat::Json));
        assert!("npz".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn test_load_pickle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.pkl");
        let state = PickledScaler {
            mean_: vec![1.0, 2.0],
            scale_: vec![0.5, 4.0],
        };
        std::fs::write(&path, serde_pickle::to_vec(&state, SerOptions::new()).unwrap()).unwrap();

        let scaler = load_scaler(&path, None).unwrap();
        assert_eq!(scaler.mean(), &[1.0, 2.0]);
        assert_eq!(scaler.scale(), &[0.5, 4.0]);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        std::fs::write(&path, r#"{"mean_": [3, 4.5], "scale_": [1, 2]}"#).unwrap();

        let scaler = load_scaler(&path, None).unwrap();
        assert_eq!(scaler.mean(), &[3.0, 4.5]);
        assert_eq!(scaler.scale(), &[1.0, 2.0]);
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_scaler(&dir.path().join("nope.pkl"), None).unwrap_err();
        assert!(matches!(err, ConvertError::SourceRead { .. }));
    }

    #[test]
    fn test_corrupt_pickle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.pkl");
        std::fs::write(&path, b"definitely not a pickle").unwrap();

        let err = load_scaler(&path, None).unwrap_err();
        assert!(matches!(err, ConvertError::SourceRead { .. }));
    }

    #[test]
    fn test_forced_format_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.bin");
        std::fs::write(&path, r#"{"mean_": [0.0], "scale_": [1.0]}"#).unwrap();

        assert!(load_scaler(&path, None).is_err());
        let scaler = load_scaler(&path, Some(SourceFormat::Json)).unwrap();
        assert_eq!(scaler.mean(), &[0.0]);
    }
}
