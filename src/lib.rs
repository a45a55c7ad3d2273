//! Monophonic melody to sargam transcription.
//!
//! Decoded PCM goes through pitch tracking, contour smoothing, quantization
//! against a just-intonation profile built from the tonic, and segmentation
//! into minimum-duration notes. The result is an immutable [`Transcription`].

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod sargam;
pub mod transcription;

#[cfg(test)]
mod testing;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use pipeline::Transcriber;
pub use sargam::label::Label;
pub use sargam::profile::{build_profile, TonalProfile};
pub use transcription::Transcription;
