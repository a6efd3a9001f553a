use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Relative location of the extracted dataset under the project root.
pub const DEFAULT_DATA_ROOT: &str = "data/voicebank_demand";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("unknown split `{0}` (expected `train` or `test`)")]
    UnknownSplit(String),
    #[error("unknown category `{0}` (expected `clean` or `noisy`)")]
    UnknownCategory(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "test" => Ok(Split::Test),
            other => Err(LayoutError::UnknownSplit(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Clean,
    Noisy,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Clean, Category::Noisy];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Clean => "clean",
            Category::Noisy => "noisy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clean" => Ok(Category::Clean),
            "noisy" => Ok(Category::Noisy),
            other => Err(LayoutError::UnknownCategory(other.to_string())),
        }
    }
}

/// The `<root>/<split>/<category>/<id>.wav` tree shared by extraction and
/// manifest building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Layout at `data/voicebank_demand` under the given project root.
    pub fn under<P: AsRef<Path>>(project_root: P) -> Self {
        Self::new(project_path(project_root, DEFAULT_DATA_ROOT))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, split: Split, category: Category) -> PathBuf {
        self.root.join(split.as_str()).join(category.as_str())
    }

    pub fn wav_path(&self, split: Split, category: Category, id: &str) -> PathBuf {
        self.dir(split, category).join(format!("{id}.wav"))
    }

    /// Create all four split/category directories. Safe to call repeatedly.
    pub fn create_dirs(&self) -> Result<()> {
        for split in Split::ALL {
            for category in Category::ALL {
                let dir = self.dir(split, category);
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("failed to create directory: {}", dir.display()))?;
            }
        }
        Ok(())
    }

    pub fn list_wavs(&self, split: Split, category: Category) -> Result<Vec<PathBuf>> {
        list_wavs(&self.dir(split, category))
    }

    pub fn count_wavs(&self, split: Split, category: Category) -> Result<usize> {
        Ok(self.list_wavs(split, category)?.len())
    }
}

/// `rel` under `project_root`. The current directory yields `rel` unchanged,
/// so a bare run reports `dataset_manifest.csv` rather than `./dataset_manifest.csv`.
pub fn project_path<P: AsRef<Path>, R: AsRef<Path>>(project_root: P, rel: R) -> PathBuf {
    let root = project_root.as_ref();
    if root.as_os_str().is_empty() || root == Path::new(".") {
        return rel.as_ref().to_path_buf();
    }
    root.join(rel)
}

/// Sorted `*.wav` files directly inside `dir`. A missing directory is empty.
pub fn list_wavs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read entry in: {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|e| e == "wav") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}
