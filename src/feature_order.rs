//! Operator supplied feature order
//!
//! The feature names are never taken from the scaler itself. They must be
//! listed by hand in the exact order the scaler was fitted with.

use std::collections::HashSet;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};

/// Read feature names from a plain-text or CSV list file.
///
/// Names are collected record by record, field by field, so one name per
/// line and a single comma separated row both work. Lines starting with `#`
/// and empty fields are skipped.
pub fn read_feature_list(path: &Path) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_path(path)
        .map_err(|e| list_error(path, e))?;

    let mut names = vec![];
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => return Err(list_error(path, e)),
        };
        names.extend(
            record
                .iter()
                .filter(|field| !field.is_empty())
                .map(String::from),
        );
    }

    debug!(path = %path.display(), count = names.len(), "Read feature list");
    warn_duplicates(&names);
    Ok(names)
}

/// Log every name that appears more than once. Duplicates are not an error.
pub fn warn_duplicates(names: &[String]) {
    let mut seen = HashSet::new();
    for (index, name) in names.iter().enumerate() {
        if !seen.insert(name.as_str()) {
            warn!(index, name = %name, "Duplicate feature name");
        }
    }
}

fn list_error(path: &Path, err: csv::Error) -> ConvertError {
    ConvertError::FeatureList {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
