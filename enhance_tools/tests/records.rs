mod common;

use common::{wav_bytes, write_flat_partition, write_partition, Pair};
use enhance_core::audio::wav;
use enhance_tools::{
    extract::save_audio,
    records::{partition_rows, read_partition, PartitionReader},
};
use tempfile::tempdir;

#[test]
fn reads_audio_feature_rows_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train-00000-of-00005.parquet");
    let pairs = vec![Pair::new("p226_001", 800), Pair::new("p226_002", 1200)];
    write_partition(&path, &pairs);

    assert_eq!(partition_rows(&path).unwrap(), 2);

    let records = read_partition(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "p226_001");
    assert_eq!(records[1].id, "p226_002");
    assert_eq!(records[0].clean, pairs[0].clean);
    assert_eq!(records[1].noisy, pairs[1].noisy);
}

#[test]
fn reads_bare_binary_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("flat.parquet");
    let clean = wav_bytes(400, 1, 16_000);
    let noisy = wav_bytes(400, 1, 16_000);
    write_flat_partition(&path, &[("p232_010", Some(clean.clone()), Some(noisy.clone()))]);

    let records = read_partition(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].clean, clean);
    assert_eq!(records[0].noisy, noisy);
}

#[test]
fn null_audio_cell_names_the_row() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nulls.parquet");
    let audio = wav_bytes(100, 1, 16_000);
    write_flat_partition(
        &path,
        &[
            ("ok", Some(audio.clone()), Some(audio.clone())),
            ("broken", Some(audio.clone()), None),
        ],
    );

    let mut reader = PartitionReader::open(&path).unwrap();
    assert!(reader.next().unwrap().is_ok());
    let err = reader.next().unwrap().unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("bad row 1"), "{chain}");
    assert!(chain.contains("`noisy` is missing"), "{chain}");
    assert!(reader.next().is_none());
}

#[test]
fn missing_partition_is_an_error() {
    let dir = tempdir().unwrap();
    let err = partition_rows(dir.path().join("absent.parquet")).unwrap_err();
    assert!(err.to_string().contains("absent.parquet"));
}

#[test]
fn zero_frame_cell_is_written_as_empty_wav() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("empty.wav");

    save_audio(wav_bytes(0, 1, 16_000), &out).unwrap();

    let clip = wav::read_wav(&out).unwrap();
    assert!(clip.samples.is_empty());
    assert_eq!(clip.channels, 1);
    assert_eq!(clip.sample_rate, 16_000);
}
