use anyhow::{bail, ensure, Context, Result};
use image::{Rgb, RgbImage};
use ndarray::Array2;
use realfft::RealFftPlanner;
use std::path::Path;

/// STFT settings. Defaults match the classic `specgram` plot: 256-point
/// Hann window with 128 samples of overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpectrogramConfig {
    pub nfft: usize,
    pub noverlap: usize,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            nfft: 256,
            noverlap: 128,
        }
    }
}

/// One-sided power spectral density, shape `(freqs.len(), times.len())`.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub power: Array2<f32>,
    /// Bin centre frequencies in Hz.
    pub freqs: Vec<f32>,
    /// Frame centre times in seconds.
    pub times: Vec<f32>,
}

impl Spectrogram {
    pub fn freq_bins(&self) -> usize {
        self.power.nrows()
    }

    pub fn frames(&self) -> usize {
        self.power.ncols()
    }

    /// Power in decibels, floored at `max_db - dynamic_range`.
    pub fn to_db(&self, dynamic_range: f32) -> Array2<f32> {
        let db = self.power.mapv(|p| 10.0 * p.max(f32::MIN_POSITIVE).log10());
        let max_db = db.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let floor = max_db - dynamic_range;
        db.mapv(|v| v.max(floor))
    }
}

fn hann(n: usize) -> Vec<f32> {
    if n == 1 {
        return vec![1.0];
    }
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / (n - 1) as f32).cos())
        .collect()
}

/// Compute the PSD spectrogram of a mono signal.
pub fn compute(
    samples: &[f32],
    sample_rate: u32,
    config: SpectrogramConfig,
) -> Result<Spectrogram> {
    let SpectrogramConfig { nfft, noverlap } = config;
    ensure!(nfft >= 2, "nfft must be at least 2 (got {nfft})");
    ensure!(noverlap < nfft, "noverlap ({noverlap}) must be smaller than nfft ({nfft})");
    ensure!(sample_rate > 0, "sample rate must be positive");
    if samples.is_empty() {
        bail!("cannot compute a spectrogram of an empty signal");
    }

    let step = nfft - noverlap;
    let padded;
    let signal = if samples.len() < nfft {
        let mut p = samples.to_vec();
        p.resize(nfft, 0.0);
        padded = p;
        &padded[..]
    } else {
        samples
    };

    let n_frames = (signal.len() - nfft) / step + 1;
    let n_bins = nfft / 2 + 1;
    let fs = sample_rate as f32;

    let window = hann(nfft);
    let win_power: f32 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (fs * win_power);

    let mut planner = RealFftPlanner::<f32>::new();
    let r2c = planner.plan_fft_forward(nfft);
    let mut input = r2c.make_input_vec();
    let mut output = r2c.make_output_vec();

    let mut power = Array2::<f32>::zeros((n_bins, n_frames));
    for frame in 0..n_frames {
        let start = frame * step;
        for (dst, (&s, &w)) in input
            .iter_mut()
            .zip(signal[start..start + nfft].iter().zip(&window))
        {
            *dst = s * w;
        }
        r2c.process(&mut input, &mut output).context("fft failed")?;

        for (bin, c) in output.iter().enumerate() {
            let mut p = c.norm_sqr() * scale;
            // DC and (for even nfft) Nyquist appear once in the one-sided spectrum.
            let edge = bin == 0 || (nfft % 2 == 0 && bin == n_bins - 1);
            if !edge {
                p *= 2.0;
            }
            power[[bin, frame]] = p;
        }
    }

    let freqs = (0..n_bins).map(|k| k as f32 * fs / nfft as f32).collect();
    let times = (0..n_frames)
        .map(|i| (nfft as f32 / 2.0 + (i * step) as f32) / fs)
        .collect();

    Ok(Spectrogram {
        power,
        freqs,
        times,
    })
}

// Viridis anchors, evenly spaced over [0, 1].
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [71, 44, 122],
    [59, 81, 139],
    [44, 113, 142],
    [33, 144, 141],
    [39, 173, 129],
    [92, 200, 99],
    [170, 220, 50],
    [253, 231, 37],
];

pub fn colormap(t: f32) -> Rgb<u8> {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let pos = t * (VIRIDIS.len() - 1) as f32;
    let lo = (pos.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = pos - lo as f32;
    let mut rgb = [0u8; 3];
    for (i, c) in rgb.iter_mut().enumerate() {
        let a = VIRIDIS[lo][i] as f32;
        let b = VIRIDIS[lo + 1][i] as f32;
        *c = (a + (b - a) * frac).round() as u8;
    }
    Rgb(rgb)
}

const COLORBAR_GAP: u32 = 20;
const COLORBAR_WIDTH: u32 = 20;
const COLORBAR_MARGIN: u32 = 20;
const DYNAMIC_RANGE_DB: f32 = 120.0;

/// Render the spectrogram as a dB heat map (low frequencies at the bottom)
/// with a colour bar on the right.
pub fn render(spec: &Spectrogram, width: u32, height: u32) -> Result<RgbImage> {
    let reserved = COLORBAR_GAP + COLORBAR_WIDTH + COLORBAR_MARGIN;
    ensure!(width > reserved && height > 0, "figure too small: {width}x{height}");
    ensure!(spec.frames() > 0 && spec.freq_bins() > 0, "empty spectrogram");

    let db = spec.to_db(DYNAMIC_RANGE_DB);
    let max_db = db.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let min_db = db.fold(f32::INFINITY, |a, &b| a.min(b));
    let span = (max_db - min_db).max(f32::EPSILON);

    let plot_w = width - reserved;
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));

    let bins = spec.freq_bins();
    let frames = spec.frames();
    for y in 0..height {
        // Row 0 is the top of the image, i.e. the highest frequency.
        let bin = ((height - 1 - y) as usize * bins) / height as usize;
        for x in 0..plot_w {
            let frame = (x as usize * frames) / plot_w as usize;
            let t = (db[[bin, frame]] - min_db) / span;
            img.put_pixel(x, y, colormap(t));
        }
    }

    let bar_x = plot_w + COLORBAR_GAP;
    for y in 0..height {
        let t = if height > 1 {
            (height - 1 - y) as f32 / (height - 1) as f32
        } else {
            1.0
        };
        let color = colormap(t);
        for x in bar_x..bar_x + COLORBAR_WIDTH {
            img.put_pixel(x, y, color);
        }
    }

    Ok(img)
}

/// Render and save as PNG, creating parent directories as needed.
pub fn save_png<P: AsRef<Path>>(
    spec: &Spectrogram,
    path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let img = render(spec, width, height)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to save figure: {}", path.display()))?;
    Ok(())
}
