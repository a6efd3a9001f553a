use anyhow::{ensure, Context, Result};
use enhance_core::{
    audio::{
        spectrogram::{self, SpectrogramConfig},
        wav, AudioClip,
    },
    layout::project_path,
};
use log::info;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::path::{Path, PathBuf};

use crate::manifest::{read_manifest, ManifestRow, DEFAULT_MANIFEST};

pub const DEFAULT_FIGURE_DIR: &str = "outputs/figures";
pub const FIGURE_NAME: &str = "sanity_check_spectrogram.png";
pub const DEFAULT_SAMPLES: usize = 10;
// 10 x 4 inches at 100 dpi.
pub const FIGURE_WIDTH: u32 = 1000;
pub const FIGURE_HEIGHT: u32 = 400;

#[derive(Debug, Clone)]
pub struct SanityConfig {
    pub manifest_path: PathBuf,
    pub figure_dir: PathBuf,
    pub num_samples: usize,
    pub seed: Option<u64>,
}

impl SanityConfig {
    pub fn for_root<P: AsRef<Path>>(project_root: P) -> Self {
        let root = project_root.as_ref();
        Self {
            manifest_path: project_path(root, DEFAULT_MANIFEST),
            figure_dir: project_path(root, DEFAULT_FIGURE_DIR),
            num_samples: DEFAULT_SAMPLES,
            seed: None,
        }
    }

    pub fn figure_path(&self) -> PathBuf {
        self.figure_dir.join(FIGURE_NAME)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleInfo {
    pub id: String,
    pub sample_rate: u32,
    /// Clean file length in seconds.
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub struct SanityReport {
    pub samples: Vec<SampleInfo>,
    pub figure_path: PathBuf,
}

/// Pick `n` distinct rows uniformly at random.
pub fn sample_rows(rows: &[ManifestRow], n: usize, seed: Option<u64>) -> Result<Vec<ManifestRow>> {
    ensure!(
        n <= rows.len(),
        "cannot take a sample of {n} from a manifest of {} rows",
        rows.len()
    );
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Ok(rows.choose_multiple(&mut rng, n).cloned().collect())
}

pub fn run(config: &SanityConfig) -> Result<SanityReport> {
    let rows = read_manifest(&config.manifest_path)?;
    let picked = sample_rows(&rows, config.num_samples, config.seed)?;

    std::fs::create_dir_all(&config.figure_dir).with_context(|| {
        format!("failed to create directory: {}", config.figure_dir.display())
    })?;

    let mut samples = Vec::with_capacity(picked.len());
    let mut last_clean: Option<AudioClip> = None;
    for row in &picked {
        println!("file id: {}", row.id);
        let clean = wav::read_wav(&row.clean_path)?;
        let noisy = wav::read_wav(&row.noisy_path)?;
        let duration = clean.duration();
        println!("Sample Rate: {}", noisy.sample_rate);
        println!("Duration: {duration:.2}");

        samples.push(SampleInfo {
            id: row.id.clone(),
            sample_rate: noisy.sample_rate,
            duration,
        });
        last_clean = Some(clean);
    }

    // Only the final clean clip of the loop is plotted.
    let clean = last_clean.context("no rows sampled; nothing to plot")?;
    let spec = spectrogram::compute(
        &clean.to_mono(),
        clean.sample_rate,
        SpectrogramConfig::default(),
    )?;
    let figure_path = config.figure_path();
    spectrogram::save_png(&spec, &figure_path, FIGURE_WIDTH, FIGURE_HEIGHT)?;

    println!();
    println!("Spectrogram saved to {}", figure_path.display());
    info!("plotted {} frames x {} bins", spec.frames(), spec.freq_bins());

    Ok(SanityReport {
        samples,
        figure_path,
    })
}
