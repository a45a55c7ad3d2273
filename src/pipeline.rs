use std::convert::Infallible;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::audio::decode::{decode_audio, PcmBuffer};
use crate::audio::pitch::PitchTracker;
use crate::audio::smooth::smooth_contour;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::sargam::label::Label;
use crate::sargam::profile::{build_profile, estimate_tonic, TonalProfile};
use crate::sargam::quantize::quantize_sequence;
use crate::sargam::segment::build_segments;
use crate::transcription::{RawTrace, Transcription};

/// Stage-boundary abort raised by a set cancel flag.
struct Cancelled;

/// Runs the batch pipeline: pitch tracking, smoothing, quantization,
/// segmentation, assembly.
///
/// Holds a validated config and the profile for its tonic. Each call works on
/// its own data; clone the transcriber to analyse on several threads.
#[derive(Clone, Debug)]
pub struct Transcriber {
    config: AnalysisConfig,
    profile: TonalProfile,
}

impl Transcriber {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let profile = build_profile(config.tonic);
        Ok(Self { config, profile })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn profile(&self) -> &TonalProfile {
        &self.profile
    }

    /// Replace the tonic and rebuild the whole profile.
    pub fn set_tonic(&mut self, tonic: f32) -> Result<()> {
        let config = AnalysisConfig { tonic, ..self.config.clone() };
        config.validate()?;
        self.profile = build_profile(tonic);
        self.config = config;
        log::info!("Tonic set to {:.2}Hz", tonic);
        Ok(())
    }

    /// Decode `path` and transcribe it. Only decoding can fail.
    pub fn transcribe_file(&self, path: &Path) -> Result<Transcription> {
        log::info!("Transcribing {}", path.display());
        let audio = decode_audio(path, self.config.sample_rate)?;
        Ok(self.analyze(&audio.pcm, path, audio.duration))
    }

    /// Transcribe an already decoded buffer. Never fails; silence or
    /// unmatched pitch simply yields fewer segments.
    pub fn analyze(&self, pcm: &PcmBuffer, source: &Path, duration: f64) -> Transcription {
        match self.run_stages(pcm, source, duration, || Ok::<(), Infallible>(())) {
            Ok(transcription) => transcription,
            Err(never) => match never {},
        }
    }

    /// Like [`analyze`](Self::analyze), but returns `None` if `cancel` is set
    /// when a stage boundary is reached.
    pub fn analyze_cancellable(
        &self,
        pcm: &PcmBuffer,
        source: &Path,
        duration: f64,
        cancel: &AtomicBool,
    ) -> Option<Transcription> {
        let checkpoint = || {
            if cancel.load(Ordering::Relaxed) {
                log::info!("Analysis of {} cancelled", source.display());
                return Err(Cancelled);
            }
            Ok(())
        };
        self.run_stages(pcm, source, duration, checkpoint).ok()
    }

    /// The four stages and assembly. `checkpoint` runs between stages and
    /// aborts the analysis with its error.
    fn run_stages<E>(
        &self,
        pcm: &PcmBuffer,
        source: &Path,
        duration: f64,
        checkpoint: impl Fn() -> std::result::Result<(), E>,
    ) -> std::result::Result<Transcription, E> {
        log::info!("Stage 1: Pitch tracking...");
        let frames = PitchTracker::from_config(&self.config).track(pcm);
        checkpoint()?;

        let times: Vec<f64> = frames.iter().map(|f| f.time).collect();
        let raw: Vec<f32> = frames.iter().map(|f| f.frequency).collect();

        log::info!("Stage 2: Smoothing (window {})...", self.config.smoothing_window);
        let smoothed = smooth_contour(&raw, self.config.smoothing_window);
        checkpoint()?;

        log::info!("Stage 3: Quantization (Sa = {:.2}Hz)...", self.profile.tonic());
        let labels = quantize_sequence(&smoothed, &self.profile, self.config.tolerance);
        checkpoint()?;

        log::info!("Stage 4: Segmentation...");
        let segments = build_segments(&times, &labels, self.config.min_note_duration);

        let transcription = Transcription::new(
            source,
            duration,
            &self.profile,
            segments,
            RawTrace {
                times,
                frequencies: smoothed.iter().map(|&f| f64::from(f)).collect(),
                sargam_sequence: labels,
            },
        );

        if transcription.is_empty() {
            log::warn!("No clear notes detected in {}", source.display());
        }
        Ok(transcription)
    }

    /// Estimate the tonic from a recording of `reference` and adopt it.
    /// Returns the new tonic, or `None` (tonic unchanged) if nothing was voiced.
    pub fn calibrate(&mut self, pcm: &PcmBuffer, reference: Label) -> Result<Option<f32>> {
        let frames = PitchTracker::from_config(&self.config).track(pcm);
        let raw: Vec<f32> = frames.iter().map(|f| f.frequency).collect();

        match estimate_tonic(&raw, reference) {
            Some(tonic) => {
                self.set_tonic(tonic)?;
                Ok(Some(tonic))
            }
            None => {
                log::warn!("Reference contains no voiced frames; keeping Sa = {:.2}Hz", self.profile.tonic());
                Ok(None)
            }
        }
    }

    pub fn calibrate_from_file(&mut self, path: &Path, reference: Label) -> Result<Option<f32>> {
        let audio = decode_audio(path, self.config.sample_rate)?;
        self.calibrate(&audio.pcm, reference)
    }
}
