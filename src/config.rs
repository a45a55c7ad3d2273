use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Every setting the analysis core consumes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Frequency of Sa in Hz
    pub tonic: f32,
    /// Maximum distance in Hz between a frequency and its matched label
    pub tolerance: f32,
    /// Shortest note kept by segmentation, in seconds
    pub min_note_duration: f32,
    /// Analysis window in samples
    pub frame_length: usize,
    /// Stride between windows in samples
    pub hop_length: usize,
    /// Pitch search band (Hz)
    pub fmin: f32,
    pub fmax: f32,
    /// Median / moving-average width, odd
    pub smoothing_window: usize,
    /// Rate the decoder resamples to before analysis
    pub sample_rate: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tonic: default_tonic(),
            tolerance: default_tolerance(),
            min_note_duration: default_min_note_duration(),
            frame_length: default_frame_length(),
            hop_length: default_hop_length(),
            fmin: default_fmin(),
            fmax: default_fmax(),
            smoothing_window: default_smoothing_window(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl AnalysisConfig {
    /// Reject settings that no analysis could run with.
    pub fn validate(&self) -> Result<()> {
        if !self.tonic.is_finite() || self.tonic <= 0.0 {
            return Err(Error::Config(format!(
                "tonic must be a positive frequency, got {}",
                self.tonic
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::Config(format!(
                "tolerance must be >= 0 Hz, got {}",
                self.tolerance
            )));
        }
        if !self.min_note_duration.is_finite() || self.min_note_duration < 0.0 {
            return Err(Error::Config(format!(
                "minimum note duration must be >= 0 s, got {}",
                self.min_note_duration
            )));
        }
        if self.frame_length == 0 {
            return Err(Error::Config("frame length must be non-zero".into()));
        }
        if self.hop_length == 0 {
            return Err(Error::Config("hop length must be non-zero".into()));
        }
        if self.hop_length > self.frame_length {
            return Err(Error::Config(format!(
                "hop length ({}) must not exceed frame length ({})",
                self.hop_length, self.frame_length
            )));
        }
        if !(self.fmin.is_finite() && self.fmax.is_finite() && 0.0 < self.fmin && self.fmin < self.fmax) {
            return Err(Error::Config(format!(
                "pitch band must satisfy 0 < min < max, got [{}, {}]",
                self.fmin, self.fmax
            )));
        }
        if self.smoothing_window == 0 || self.smoothing_window % 2 == 0 {
            return Err(Error::Config(format!(
                "smoothing window must be odd, got {}",
                self.smoothing_window
            )));
        }
        if self.sample_rate == 0 {
            return Err(Error::Config("sample rate must be non-zero".into()));
        }
        Ok(())
    }
}

/// On-disk config file (`sargam.toml`).
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub notes_only: bool,
}

fn default_tonic() -> f32 { 261.63 }
fn default_tolerance() -> f32 { 50.0 }
fn default_min_note_duration() -> f32 { 0.1 }
fn default_frame_length() -> usize { 2048 }
fn default_hop_length() -> usize { 512 }
fn default_fmin() -> f32 { 80.0 }
fn default_fmax() -> f32 { 2000.0 }
fn default_smoothing_window() -> usize { 5 }
fn default_sample_rate() -> u32 { 22050 }

/// Read and parse a config file. Unreadable files and malformed or
/// mistyped settings are both `Error::Config`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))
}
