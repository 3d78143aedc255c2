use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scaler_profile_convert::{ConversionRequest, Converter, ConverterConfig, SourceFormat};

/// Convert a fitted feature scaler into a JSON scaling profile
#[derive(Debug, Parser)]
#[command(name = "convert", version)]
struct Cli {
    /// Serialized scaler (pickle or JSON) exposing `mean_` and `scale_`
    source: PathBuf,

    /// Output JSON document
    destination: PathBuf,

    /// Plain-text or CSV file listing the feature names in training order
    #[arg(short, long, conflicts_with = "config")]
    features: Option<PathBuf>,

    /// Converter config file (TOML, JSON or YAML) with `feature_order`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source format, detected from the extension when omitted
    #[arg(long, value_parser = parse_format)]
    source_format: Option<SourceFormat>,

    /// Pretty print the output document
    #[arg(long)]
    pretty: bool,

    /// Read the output back and compare it with what was written
    #[arg(long)]
    verify: bool,

    /// Debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_format(s: &str) -> std::result::Result<SourceFormat, String> {
    s.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("scaler_profile_convert={}", level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ConverterConfig::load(cli.config.as_deref())?;
    config.pretty |= cli.pretty;
    config.verify |= cli.verify;
    info!(
        feature_count = config.feature_count,
        pretty = config.pretty,
        verify = config.verify,
        "Configuration loaded"
    );

    let mut request = ConversionRequest::new(&cli.source, &cli.destination);
    if let Some(list) = &cli.features {
        request = request.with_feature_list(list);
    }
    if let Some(format) = cli.source_format {
        request = request.with_source_format(format);
    }

    let report = Converter::new(config)
        .convert(&request)
        .with_context(|| format!("converting {}", cli.source.display()))?;

    println!("Wrote {}", report.destination.display());
    Ok(())
}
