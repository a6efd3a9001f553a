#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use parquet::{
    data_type::{ByteArray, ByteArrayType},
    file::{properties::WriterProperties, writer::SerializedFileWriter},
    schema::parser::parse_message_type,
};
use std::{fs::File, io::Cursor, path::Path, sync::Arc};

/// The shape `datasets` writes for an `Audio` feature.
const AUDIO_SCHEMA: &str = "
message schema {
    required binary id (UTF8);
    required group clean {
        required binary bytes;
        optional binary path (UTF8);
    }
    required group noisy {
        required binary bytes;
        optional binary path (UTF8);
    }
}
";

const FLAT_SCHEMA: &str = "
message schema {
    required binary id (UTF8);
    optional binary clean;
    optional binary noisy;
}
";

/// A 16-bit PCM wav file in memory: a sawtooth of `frames` frames.
pub fn wav_bytes(frames: usize, channels: u16, sample_rate: u32) -> Vec<u8> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut buf = Vec::new();
    let mut writer = WavWriter::new(Cursor::new(&mut buf), spec).unwrap();
    for i in 0..frames {
        for _ in 0..channels {
            writer.write_sample(((i % 200) as i16 - 100) * 50).unwrap();
        }
    }
    writer.finalize().unwrap();
    buf
}

pub struct Pair {
    pub id: String,
    pub clean: Vec<u8>,
    pub noisy: Vec<u8>,
}

impl Pair {
    pub fn new(id: &str, frames: usize) -> Self {
        Self {
            id: id.to_string(),
            clean: wav_bytes(frames, 1, 16_000),
            noisy: wav_bytes(frames, 1, 16_000),
        }
    }
}

fn open_writer(path: &Path, schema: &str) -> SerializedFileWriter<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let schema = Arc::new(parse_message_type(schema).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    SerializedFileWriter::new(File::create(path).unwrap(), schema, props).unwrap()
}

/// Write `pairs` as one row group using the audio-feature schema.
pub fn write_partition(path: &Path, pairs: &[Pair]) {
    let ids: Vec<ByteArray> = pairs.iter().map(|p| ByteArray::from(p.id.as_str())).collect();
    let clean: Vec<ByteArray> = pairs.iter().map(|p| ByteArray::from(p.clean.clone())).collect();
    let noisy: Vec<ByteArray> = pairs.iter().map(|p| ByteArray::from(p.noisy.clone())).collect();
    let names: Vec<ByteArray> = pairs
        .iter()
        .map(|p| ByteArray::from(format!("{}.wav", p.id).as_str()))
        .collect();
    let present = vec![1i16; pairs.len()];

    let mut writer = open_writer(path, AUDIO_SCHEMA);
    let mut rg = writer.next_row_group().unwrap();
    let mut index = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        let w = col.typed::<ByteArrayType>();
        match index {
            0 => w.write_batch(&ids, None, None),
            1 => w.write_batch(&clean, None, None),
            3 => w.write_batch(&noisy, None, None),
            _ => w.write_batch(&names, Some(&present), None),
        }
        .unwrap();
        col.close().unwrap();
        index += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

fn nullable<'a>(cells: impl Iterator<Item = Option<&'a Vec<u8>>>) -> (Vec<ByteArray>, Vec<i16>) {
    let mut values = Vec::new();
    let mut defs = Vec::new();
    for cell in cells {
        match cell {
            Some(bytes) => {
                values.push(ByteArray::from(bytes.clone()));
                defs.push(1);
            }
            None => defs.push(0),
        }
    }
    (values, defs)
}

/// Bare binary audio columns; `None` cells are written as nulls.
pub fn write_flat_partition(path: &Path, rows: &[(&str, Option<Vec<u8>>, Option<Vec<u8>>)]) {
    let ids: Vec<ByteArray> = rows.iter().map(|(id, _, _)| ByteArray::from(*id)).collect();
    let (clean, clean_defs) = nullable(rows.iter().map(|r| r.1.as_ref()));
    let (noisy, noisy_defs) = nullable(rows.iter().map(|r| r.2.as_ref()));

    let mut writer = open_writer(path, FLAT_SCHEMA);
    let mut rg = writer.next_row_group().unwrap();
    let mut index = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        let w = col.typed::<ByteArrayType>();
        match index {
            0 => w.write_batch(&ids, None, None),
            1 => w.write_batch(&clean, Some(&clean_defs), None),
            _ => w.write_batch(&noisy, Some(&noisy_defs), None),
        }
        .unwrap();
        col.close().unwrap();
        index += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

/// Populate the five train partitions and the test partition under
/// `<root>/data/voicebank_demand/data/`.
pub fn write_dataset(root: &Path, train: &[Vec<Pair>; 5], test: &[Pair]) {
    let data = root.join("data/voicebank_demand/data");
    for (i, pairs) in train.iter().enumerate() {
        write_partition(&data.join(format!("train-{i:05}-of-00005.parquet")), pairs);
    }
    write_partition(&data.join("test-00000-of-00001.parquet"), test);
}
