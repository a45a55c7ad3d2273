use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use super::decode::PcmBuffer;
use crate::config::AnalysisConfig;

/// Autocorrelation peaks below this fraction of the zero-lag energy are ignored.
const PEAK_THRESHOLD: f32 = 0.3;

/// One analysis hop. `frequency == 0.0` means unvoiced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PitchFrame {
    /// Start of the window in seconds
    pub time: f64,
    pub frequency: f32,
}

/// Per-frame fundamental estimation by windowed autocorrelation.
///
/// The autocorrelation is computed through a zero-padded FFT (twice the frame
/// length, so lags don't wrap). The first local maximum reaching
/// `PEAK_THRESHOLD` of the zero-lag value is taken as the period.
pub struct PitchTracker {
    frame_length: usize,
    hop_length: usize,
    fmin: f32,
    fmax: f32,
    window: Vec<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl PitchTracker {
    pub fn new(frame_length: usize, hop_length: usize, fmin: f32, fmax: f32) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let padded = frame_length * 2;
        Self {
            frame_length,
            hop_length,
            fmin,
            fmax,
            window: hann_window(frame_length),
            forward: planner.plan_fft_forward(padded),
            inverse: planner.plan_fft_inverse(padded),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.frame_length, config.hop_length, config.fmin, config.fmax)
    }

    /// Number of frames produced for `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        if self.hop_length == 0 || len < self.frame_length {
            return 0;
        }
        (len - self.frame_length) / self.hop_length + 1
    }

    /// Track the whole buffer. Buffers shorter than one frame yield no frames.
    pub fn track(&self, pcm: &PcmBuffer) -> Vec<PitchFrame> {
        let count = self.frame_count(pcm.samples.len());
        let sr = f64::from(pcm.sample_rate);

        let mut scratch = vec![Complex::new(0.0f32, 0.0); self.frame_length * 2];
        let mut frames = Vec::with_capacity(count);

        for i in 0..count {
            let start = i * self.hop_length;
            let frame = &pcm.samples[start..start + self.frame_length];
            let frequency = self.estimate(frame, pcm.sample_rate, &mut scratch);
            frames.push(PitchFrame {
                time: start as f64 / sr,
                frequency,
            });
        }

        let voiced = frames.iter().filter(|f| f.frequency > 0.0).count();
        log::info!("Pitch tracking: {} frames, {} voiced", frames.len(), voiced);

        frames
    }

    fn estimate(&self, frame: &[f32], sample_rate: u32, scratch: &mut [Complex<f32>]) -> f32 {
        for (i, slot) in scratch.iter_mut().enumerate() {
            *slot = if i < frame.len() {
                Complex::new(frame[i] * self.window[i], 0.0)
            } else {
                Complex::new(0.0, 0.0)
            };
        }

        self.forward.process(scratch);
        for c in scratch.iter_mut() {
            *c = Complex::new(c.norm_sqr(), 0.0);
        }
        self.inverse.process(scratch);

        let autocorr: Vec<f32> = scratch[..self.frame_length].iter().map(|c| c.re).collect();

        let Some(lag) = first_peak(&autocorr, PEAK_THRESHOLD) else {
            return 0.0;
        };

        let frequency = sample_rate as f32 / lag as f32;
        if !frequency.is_finite() || frequency < self.fmin || frequency > self.fmax {
            return 0.0;
        }
        frequency
    }
}

/// First lag >= 1 that is a local maximum of `autocorr` and reaches
/// `threshold` times the global maximum. Plateaus resolve to their first sample.
fn first_peak(autocorr: &[f32], threshold: f32) -> Option<usize> {
    let max = autocorr.iter().copied().fold(0.0f32, f32::max);
    if max <= 1e-10 {
        return None;
    }
    let height = threshold * max;

    (2..autocorr.len().saturating_sub(1)).find(|&lag| {
        autocorr[lag] >= height
            && autocorr[lag] > autocorr[lag - 1]
            && autocorr[lag] >= autocorr[lag + 1]
    })
}

fn hann_window(size: usize) -> Vec<f32> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}
