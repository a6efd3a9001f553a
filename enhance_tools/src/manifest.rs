use anyhow::{Context, Result};
use enhance_core::{Category, DatasetLayout, Split};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MANIFEST: &str = "dataset_manifest.csv";

/// One clean/noisy pair. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub id: String,
    pub split: Split,
    pub clean_path: String,
    pub noisy_path: String,
}

#[derive(Debug, Default)]
pub struct SplitScan {
    pub rows: Vec<ManifestRow>,
    /// Ids whose noisy counterpart was missing.
    pub skipped: Vec<String>,
}

pub fn scan_split(layout: &DatasetLayout, split: Split) -> Result<SplitScan> {
    let noisy_dir = layout.dir(split, Category::Noisy);
    let clean_files = layout.list_wavs(split, Category::Clean)?;

    info!("Found {} {split} files...", clean_files.len());

    let mut scan = SplitScan::default();
    for clean_path in clean_files {
        let Some(file_id) = clean_path.file_stem().map(|s| s.to_string_lossy().into_owned())
        else {
            continue;
        };
        let Some(file_name) = clean_path.file_name() else {
            continue;
        };
        let noisy_path = noisy_dir.join(file_name);

        if !noisy_path.exists() {
            warn!("missing noisy file for {file_id}, skipping...");
            scan.skipped.push(file_id);
            continue;
        }

        scan.rows.push(ManifestRow {
            id: file_id,
            split,
            clean_path: clean_path.to_string_lossy().into_owned(),
            noisy_path: noisy_path.to_string_lossy().into_owned(),
        });
    }

    Ok(scan)
}

/// Rows for every split, train first.
pub fn build_manifest(layout: &DatasetLayout) -> Result<Vec<ManifestRow>> {
    let mut rows = Vec::new();
    for split in Split::ALL {
        rows.extend(scan_split(layout, split)?.rows);
    }
    Ok(rows)
}

pub fn write_manifest<P: AsRef<Path>>(path: P, rows: &[ManifestRow]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    // Serializing structs only emits a header alongside the first record.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create manifest: {}", path.display()))?;
    writer.write_record(["id", "split", "clean_path", "noisy_path"])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().with_context(|| format!("failed to write manifest: {}", path.display()))?;
    Ok(())
}

pub fn read_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<ManifestRow>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to open manifest: {}", path.display()))?;

    let mut rows = Vec::new();
    for result in rdr.deserialize::<ManifestRow>() {
        rows.push(result.context("failed to parse a manifest row")?);
    }
    Ok(rows)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifestSummary {
    pub train: usize,
    pub test: usize,
}

impl ManifestSummary {
    pub fn from_rows(rows: &[ManifestRow]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            match row.split {
                Split::Train => acc.train += 1,
                Split::Test => acc.test += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.train + self.test
    }
}

pub fn run(layout: &DatasetLayout, output: &Path) -> Result<ManifestSummary> {
    let rows = build_manifest(layout)?;
    write_manifest(output, &rows)?;

    let summary = ManifestSummary::from_rows(&rows);
    println!();
    println!("Manifest written to {}", output.display());
    println!("  Train pairs : {}", summary.train);
    println!("  Test pairs  : {}", summary.test);
    println!("  Total pairs : {}", summary.total());
    println!();
    println!("First few rows:");
    println!("id,split,clean_path,noisy_path");
    for row in rows.iter().take(5) {
        println!("{},{},{},{}", row.id, row.split, row.clean_path, row.noisy_path);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(layout: &DatasetLayout, split: Split, category: Category, id: &str) {
        std::fs::write(layout.wav_path(split, category, id), b"").unwrap();
    }

    #[test]
    fn matched_pairs_become_rows() {
        let dir = tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path());
        layout.create_dirs().unwrap();
        for id in ["p226_002", "p226_001"] {
            touch(&layout, Split::Train, Category::Clean, id);
            touch(&layout, Split::Train, Category::Noisy, id);
        }

        let rows = build_manifest(&layout).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.split == Split::Train));
        assert_eq!(rows[0].id, "p226_001");
        assert!(rows[0].noisy_path.ends_with("train/noisy/p226_001.wav"));
    }

    #[test]
    fn unmatched_clean_file_is_skipped() {
        let dir = tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path());
        layout.create_dirs().unwrap();
        for id in ["a", "b", "c"] {
            touch(&layout, Split::Test, Category::Clean, id);
        }
        touch(&layout, Split::Test, Category::Noisy, "a");
        touch(&layout, Split::Test, Category::Noisy, "c");

        testing_logger::setup();
        let scan = scan_split(&layout, Split::Test).unwrap();
        assert_eq!(scan.rows.len(), 2);
        assert_eq!(scan.skipped, vec!["b".to_string()]);

        testing_logger::validate(|logs| {
            let warnings: Vec<&str> = logs
                .iter()
                .filter(|l| l.level == log::Level::Warn)
                .map(|l| l.body.as_str())
                .collect();
            assert_eq!(warnings, vec!["missing noisy file for b, skipping..."]);
        });
    }

    #[test]
    fn header_is_written_for_empty_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/manifest.csv");
        write_manifest(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "id,split,clean_path,noisy_path\n");
        assert!(read_manifest(&path).unwrap().is_empty());
    }

    #[test]
    fn rows_survive_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.csv");
        let rows = vec![
            ManifestRow {
                id: "p226_001".into(),
                split: Split::Train,
                clean_path: "data/voicebank_demand/train/clean/p226_001.wav".into(),
                noisy_path: "data/voicebank_demand/train/noisy/p226_001.wav".into(),
            },
            ManifestRow {
                id: "p232_001".into(),
                split: Split::Test,
                clean_path: "data/voicebank_demand/test/clean/p232_001.wav".into(),
                noisy_path: "data/voicebank_demand/test/noisy/p232_001.wav".into(),
            },
        ];
        write_manifest(&path, &rows).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("id,split,clean_path,noisy_path\np226_001,train,"));
        assert_eq!(read_manifest(&path).unwrap(), rows);
        assert_eq!(
            ManifestSummary::from_rows(&rows),
            ManifestSummary { train: 1, test: 1 }
        );
    }

    #[test]
    fn unknown_split_fails_to_parse() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.csv");
        std::fs::write(&path, "id,split,clean_path,noisy_path\nx,valid,a.wav,b.wav\n").unwrap();
        assert!(read_manifest(&path).is_err());
    }
}
