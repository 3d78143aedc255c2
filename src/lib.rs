//! Converts a fitted standard scaler into a JSON scaling profile
//! (`mean`, inverted `scale`, `featureOrder`) for runtimes that cannot read
//! the training environment's serialized objects.

pub mod config;
pub mod converter;
pub mod error;
pub mod feature_order;
pub mod profile;
pub mod scalers;
pub mod source;
pub mod writer;

pub use crate::config::{ConverterConfig, FEATURE_COUNT};
pub use converter::{ConversionReport, ConversionRequest, Converter};
pub use error::{ConvertError, Result};
pub use profile::ScalingProfile;
pub use scalers::StandardScaler;
pub use source::SourceFormat;
