use anyhow::{ensure, Context, Result};
use enhance_core::{
    audio::{decoder, wav},
    Category, DatasetLayout, Split,
};
use log::info;
use std::path::{Path, PathBuf};

use crate::records::{partition_rows, AudioRecordPair, PartitionReader};

pub const TRAIN_PARTITIONS: usize = 5;

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub layout: DatasetLayout,
    pub train_partitions: Vec<PathBuf>,
    pub test_partitions: Vec<PathBuf>,
    pub train_progress_every: usize,
    pub test_progress_every: usize,
}

impl ExtractConfig {
    /// The fixed Hugging Face snapshot layout under `project_root`.
    pub fn for_root<P: AsRef<Path>>(project_root: P) -> Self {
        let layout = DatasetLayout::under(project_root);
        let data_dir = layout.root().join("data");
        let train_partitions = (0..TRAIN_PARTITIONS)
            .map(|i| data_dir.join(format!("train-{i:05}-of-{TRAIN_PARTITIONS:05}.parquet")))
            .collect();
        let test_partitions = vec![data_dir.join("test-00000-of-00001.parquet")];

        Self {
            layout,
            train_partitions,
            test_partitions,
            train_progress_every: 500,
            test_progress_every: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitCounts {
    pub clean: usize,
    pub noisy: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub train_pairs: usize,
    pub test_pairs: usize,
    pub train_files: SplitCounts,
    pub test_files: SplitCounts,
}

/// Partitions of one split, treated as a single concatenated table.
struct SplitSource<'a> {
    partitions: &'a [PathBuf],
    rows: usize,
}

impl<'a> SplitSource<'a> {
    fn load(partitions: &'a [PathBuf]) -> Result<Self> {
        let mut rows = 0;
        for path in partitions {
            rows += partition_rows(path)?;
            info!("  Loaded {}", path.display());
        }
        Ok(Self { partitions, rows })
    }

    fn records(&self) -> impl Iterator<Item = Result<AudioRecordPair>> + 'a {
        let partitions = self.partitions;
        partitions.iter().flat_map(|path| {
            let opened: Box<dyn Iterator<Item = Result<AudioRecordPair>>> =
                match PartitionReader::open(path) {
                    Ok(reader) => Box::new(reader),
                    Err(e) => Box::new(std::iter::once(Err(e))),
                };
            opened
        })
    }
}

/// Decode one embedded audio cell and write it as `<split>/<category>/<id>.wav`.
pub fn save_audio(bytes: Vec<u8>, output_path: &Path) -> Result<()> {
    let clip = decoder::decode_bytes(bytes)
        .with_context(|| format!("failed to decode audio for {}", output_path.display()))?;
    wav::write_pcm16(output_path, &clip)
}

fn extract_split(
    layout: &DatasetLayout,
    split: Split,
    source: &SplitSource<'_>,
    progress_every: usize,
) -> Result<usize> {
    info!("Extracting {} {split} pairs to wav...", source.rows);

    let mut written = 0;
    for (i, record) in source.records().enumerate() {
        let AudioRecordPair { id, clean, noisy } = record?;
        save_audio(clean, &layout.wav_path(split, Category::Clean, &id))?;
        save_audio(noisy, &layout.wav_path(split, Category::Noisy, &id))?;
        written += 1;

        if progress_every > 0 && i % progress_every == 0 {
            info!("  {i}/{} done...", source.rows);
        }
    }
    Ok(written)
}

/// Count the wav files in each split and fail if clean and noisy disagree.
pub fn verify(layout: &DatasetLayout) -> Result<(SplitCounts, SplitCounts)> {
    info!("Verifying extracted files...");
    let count = |split| -> Result<SplitCounts> {
        Ok(SplitCounts {
            clean: layout.count_wavs(split, Category::Clean)?,
            noisy: layout.count_wavs(split, Category::Noisy)?,
        })
    };
    let train = count(Split::Train)?;
    let test = count(Split::Test)?;

    info!("  Train clean : {} files", train.clean);
    info!("  Train noisy : {} files", train.noisy);
    info!("  Test clean  : {} files", test.clean);
    info!("  Test noisy  : {} files", test.noisy);

    ensure!(train.clean == train.noisy, "Train clean/noisy count mismatch!");
    ensure!(test.clean == test.noisy, "Test clean/noisy count mismatch!");
    Ok((train, test))
}

pub fn run(config: &ExtractConfig) -> Result<ExtractReport> {
    config.layout.create_dirs()?;

    info!("Loading train parquet files...");
    let train = SplitSource::load(&config.train_partitions)?;
    info!("Loading test parquet file...");
    let test = SplitSource::load(&config.test_partitions)?;

    info!("Train pairs: {}", train.rows);
    info!("Test pairs:  {}", test.rows);

    let train_pairs = extract_split(
        &config.layout,
        Split::Train,
        &train,
        config.train_progress_every,
    )?;
    let test_pairs = extract_split(
        &config.layout,
        Split::Test,
        &test,
        config.test_progress_every,
    )?;

    let (train_files, test_files) = verify(&config.layout)?;
    info!("All counts match. Dataset ready.");

    Ok(ExtractReport {
        train_pairs,
        test_pairs,
        train_files,
        test_files,
    })
}
