// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bitonal command-line host.
//
// Loads one page photo, binarizes it and saves PNG, TIFF-G4 and JBIG-named
// copies. Settings come from defaults, then an optional JSON config file,
// then command-line flags.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bitonal_core::human_errors::{HumanError, humanize_error, humanize_failures};
use bitonal_core::types::{ArtifactFormat, BackendPreference, SaveReport, default_base_filename};
use bitonal_core::{BitonalError, ScanConfig};
use bitonal_scan::{BinaryPlane, GrayPlane, ScanPipeline};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

/// Longer side of the preview image, matching the on-screen preview.
const PREVIEW_SIDE: u32 = 400;

#[derive(Parser)]
#[command(name = "bitonal")]
#[command(about = "Binarize a photographed document page and archive it")]
#[command(version)]
struct Cli {
    /// Page photo to process (JPEG, PNG, TIFF, ...).
    input: PathBuf,

    /// Directory that receives the saved files.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Base filename; defaults to `{prefix}_{YYYYMMDD_HHMMSS}`.
    #[arg(long)]
    name: Option<String>,

    /// Local window size in pixels. Even values are rounded up to odd.
    #[arg(long, allow_negative_numbers = true)]
    window_size: Option<i32>,

    /// Threshold offset C; larger values keep more background.
    #[arg(long, allow_negative_numbers = true)]
    bias: Option<i32>,

    /// Denoising strength; 0 disables denoising.
    #[arg(long)]
    denoise: Option<u32>,

    /// Backend to request.
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Resolution written into the TIFF container.
    #[arg(long)]
    dpi: Option<u32>,

    /// JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also write a downscaled preview PNG to this path.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Auto,
    Accelerated,
    Fallback,
}

impl From<BackendArg> for BackendPreference {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => BackendPreference::Auto,
            BackendArg::Accelerated => BackendPreference::Accelerated,
            BackendArg::Fallback => BackendPreference::Fallback,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) if !report.is_empty() => {
            println!("{}", report.summary());
            for artifact in &report.artifacts {
                println!("  - {}: {}", artifact.format, artifact.path.display());
            }
            ExitCode::SUCCESS
        }
        Ok(report) => {
            println!("{}", report.summary());
            if let Some(human) = humanize_failures(&report.failures) {
                print_human(&human);
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "Run failed");
            print_human(&humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn print_human(human: &HumanError) {
    eprintln!("Error: {}", human.message);
    eprintln!("{}", human.suggestion);
}

fn run(cli: &Cli) -> Result<SaveReport, BitonalError> {
    let config = resolve_config(cli)?;
    let pipeline = ScanPipeline::from_config(&config);

    info!(input = %cli.input.display(), "Loading page");
    let plane = GrayPlane::open(&cli.input)?;
    let binary = pipeline.process(&plane)?;

    // The preview is a display extra; archiving goes ahead without it.
    if let Some(path) = &cli.preview {
        match write_preview(&binary, path) {
            Ok(()) => info!(path = %path.display(), "Preview written"),
            Err(err) => warn!(error = %err, "Preview not written, continuing with save"),
        }
    }

    let base = cli
        .name
        .clone()
        .unwrap_or_else(|| default_base_filename(&config.file_prefix));
    bitonal_scan::save_with_dpi(&binary, &config.output_dir, &base, config.dpi)
}

fn write_preview(binary: &BinaryPlane, path: &Path) -> Result<(), BitonalError> {
    binary
        .preview(PREVIEW_SIDE)
        .save(path)
        .map_err(|err| BitonalError::Encode {
            format: ArtifactFormat::Png,
            reason: format!("failed to write preview {}: {err}", path.display()),
        })
}

/// Defaults, overridden by the config file, overridden by flags.
fn resolve_config(cli: &Cli) -> Result<ScanConfig, BitonalError> {
    let mut config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };

    if let Some(window_size) = cli.window_size {
        config.params = config.params.with_window_size(window_size)?;
    }
    if let Some(bias) = cli.bias {
        config.params = config.params.with_bias(bias);
    }
    if let Some(strength) = cli.denoise {
        config.params = config.params.with_denoise_strength(strength);
    }
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    if let Some(dpi) = cli.dpi {
        if dpi == 0 {
            return Err(BitonalError::Config("dpi must be positive".into()));
        }
        config.dpi = dpi;
    }
    if let Some(dir) = &cli.out_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}
