//! WAV reading and writing.
//!
//! Output files are 16-bit PCM. Float samples are scaled by 32768 (the same
//! factor Symphonia uses when widening i16 to f32) and clamped, so 16-bit
//! sources survive a decode/encode pass unchanged.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::{
    io::{Cursor, Seek, Write},
    path::Path,
};

use super::AudioClip;

fn pcm16_spec(clip: &AudioClip) -> WavSpec {
    WavSpec {
        channels: clip.channels,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

pub fn f32_to_i16(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

fn write_samples<W: Write + Seek>(mut writer: WavWriter<W>, clip: &AudioClip) -> Result<()> {
    {
        let mut w16 = writer.get_i16_writer(clip.samples.len() as u32);
        for &s in &clip.samples {
            w16.write_sample(f32_to_i16(s));
        }
        w16.flush().context("failed to write samples")?;
    }
    writer.finalize().context("failed to finalize wav")?;
    Ok(())
}

/// Write `clip` to `path` as 16-bit PCM, replacing any existing file.
pub fn write_pcm16<P: AsRef<Path>>(path: P, clip: &AudioClip) -> Result<()> {
    let path = path.as_ref();
    let writer = WavWriter::create(path, pcm16_spec(clip))
        .with_context(|| format!("failed to create wav: {}", path.display()))?;
    write_samples(writer, clip).with_context(|| format!("failed to write wav: {}", path.display()))
}

/// Encode `clip` as an in-memory 16-bit PCM WAV.
pub fn encode_pcm16(clip: &AudioClip) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let writer = WavWriter::new(Cursor::new(&mut buf), pcm16_spec(clip))
        .context("failed to start wav encoder")?;
    write_samples(writer, clip)?;
    Ok(buf)
}

/// Read a WAV file into f32 samples, whatever its sample format.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioClip> {
    let path = path.as_ref();
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open wav: {}", path.display()))?;

    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<f32>, _>>()
            .with_context(|| format!("failed to read samples: {}", path.display()))?,
        SampleFormat::Int => {
            let max_val = (1u32 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<f32>, _>>()
                .with_context(|| format!("failed to read samples: {}", path.display()))?
        }
    };

    Ok(AudioClip::new(samples, spec.channels, spec.sample_rate))
}
