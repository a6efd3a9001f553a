//! Flags and logging shared by the three dataset binaries.
//!
//! Every flag has a default, so each tool runs bare from the project root.

use clap::{Args, Parser};
use env_logger::Env;
use std::path::PathBuf;

/// Send `info!` and above to stderr unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

#[derive(Args, Debug, Clone)]
pub struct RootArg {
    /// Project root the dataset paths are relative to
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

/// Convert the VoiceBank-DEMAND parquet partitions into per-utterance wav files
#[derive(Parser, Debug)]
#[command(name = "extract_dataset", version, about)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub root: RootArg,
}

/// Pair extracted clean/noisy wav files into a CSV manifest
#[derive(Parser, Debug)]
#[command(name = "make_manifest", version, about)]
pub struct ManifestArgs {
    #[command(flatten)]
    pub root: RootArg,

    /// Output CSV, relative to the project root
    #[arg(long, default_value = crate::manifest::DEFAULT_MANIFEST)]
    pub output: PathBuf,
}

/// Spot-check random manifest rows and plot one spectrogram
#[derive(Parser, Debug)]
#[command(name = "sanity_check", version, about)]
pub struct SanityArgs {
    #[command(flatten)]
    pub root: RootArg,

    /// Number of manifest rows to sample
    #[arg(long, default_value_t = crate::sanity::DEFAULT_SAMPLES)]
    pub samples: usize,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,
}
