//! Parquet partitions of the Hugging Face VoiceBank-DEMAND export.
//!
//! Each row has a string `id` and two audio cells, `clean` and `noisy`.
//! An audio cell is a group `{ bytes: binary, path: string }`; a bare
//! binary column is accepted as well.

use anyhow::{anyhow, bail, Context, Result};
use parquet::{
    file::reader::{FileReader, SerializedFileReader},
    record::{reader::RowIter, Field, Row},
};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRecordPair {
    pub id: String,
    /// Encoded audio (a complete WAV/FLAC file), not raw samples.
    pub clean: Vec<u8>,
    pub noisy: Vec<u8>,
}

fn open(path: &Path) -> Result<SerializedFileReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("failed to open partition: {}", path.display()))?;
    SerializedFileReader::new(file)
        .with_context(|| format!("failed to read parquet footer: {}", path.display()))
}

/// Row count from the footer, without touching any data pages.
pub fn partition_rows<P: AsRef<Path>>(path: P) -> Result<usize> {
    let reader = open(path.as_ref())?;
    let rows = reader.metadata().file_metadata().num_rows();
    usize::try_from(rows).map_err(|_| anyhow!("negative row count in {}", path.as_ref().display()))
}

/// Streams [`AudioRecordPair`]s out of one partition, row by row.
pub struct PartitionReader {
    path: PathBuf,
    rows: RowIter<'static>,
    index: usize,
}

impl PartitionReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let rows = open(&path)?.into_iter();
        Ok(Self {
            path,
            rows,
            index: 0,
        })
    }
}

impl Iterator for PartitionReader {
    type Item = Result<AudioRecordPair>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        let index = self.index;
        self.index += 1;

        Some(
            row.map_err(anyhow::Error::from)
                .and_then(|row| record_from_row(&row))
                .with_context(|| format!("bad row {index} in {}", self.path.display())),
        )
    }
}

/// Load a whole partition into memory.
pub fn read_partition<P: AsRef<Path>>(path: P) -> Result<Vec<AudioRecordPair>> {
    PartitionReader::open(path)?.collect()
}

fn column<'a>(row: &'a Row, name: &str) -> Option<&'a Field> {
    row.get_column_iter()
        .find(|(col, _)| col.as_str() == name)
        .map(|(_, field)| field)
}

fn audio_bytes(row: &Row, name: &str) -> Result<Vec<u8>> {
    match column(row, name) {
        Some(Field::Bytes(b)) => Ok(b.data().to_vec()),
        Some(Field::Group(cell)) => match column(cell, "bytes") {
            Some(Field::Bytes(b)) => Ok(b.data().to_vec()),
            Some(Field::Null) | None => bail!("`{name}.bytes` is missing"),
            Some(other) => bail!("`{name}.bytes` has unexpected type: {other:?}"),
        },
        Some(Field::Null) | None => bail!("`{name}` is missing"),
        Some(other) => bail!("`{name}` has unexpected type: {other:?}"),
    }
}

pub(crate) fn record_from_row(row: &Row) -> Result<AudioRecordPair> {
    let id = match column(row, "id") {
        Some(Field::Str(s)) => s.clone(),
        Some(Field::Bytes(b)) => String::from_utf8(b.data().to_vec()).context("`id` is not utf-8")?,
        Some(Field::Null) | None => bail!("`id` is missing"),
        Some(other) => bail!("`id` has unexpected type: {other:?}"),
    };

    Ok(AudioRecordPair {
        clean: audio_bytes(row, "clean")?,
        noisy: audio_bytes(row, "noisy")?,
        id,
    })
}
