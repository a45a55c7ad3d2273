//! The finished, read-only result of one analysis and its projections.

pub mod export;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sargam::label::Label;
use crate::sargam::profile::TonalProfile;
use crate::sargam::segment::NoteSegment;

const RULE_WIDTH: usize = 50;

/// Frame-level diagnostics kept alongside the segments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrace {
    pub times: Vec<f64>,
    /// Smoothed contour, Hz (0 = unvoiced)
    pub frequencies: Vec<f64>,
    pub sargam_sequence: Vec<Option<Label>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub file_path: String,
    /// Source duration in seconds
    pub duration: f64,
    /// Tonic used for the analysis, Hz
    pub base_frequency: f64,
    /// Local creation time, ISO-8601 without offset
    pub timestamp: NaiveDateTime,
    pub note_segments: Vec<NoteSegment>,
    pub raw_data: RawTrace,
}

impl Transcription {
    pub fn new(
        file_path: &Path,
        duration: f64,
        profile: &TonalProfile,
        note_segments: Vec<NoteSegment>,
        raw_data: RawTrace,
    ) -> Self {
        Self {
            file_path: file_path.display().to_string(),
            duration,
            base_frequency: f64::from(profile.tonic()),
            timestamp: chrono::Local::now().naive_local(),
            note_segments,
            raw_data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.note_segments.is_empty()
    }

    /// Segment labels in time order, space separated. Empty when no notes.
    pub fn compact_notation(&self) -> String {
        self.note_segments
            .iter()
            .map(|s| s.note.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// One line per segment: `start - end: label (duration)`.
    pub fn timeline(&self) -> Vec<String> {
        self.note_segments
            .iter()
            .map(|s| {
                format!(
                    "{:6.2}s - {:6.2}s: {:>4} ({:.2}s)",
                    s.start_time,
                    s.end_time,
                    s.note.to_string(),
                    s.duration
                )
            })
            .collect()
    }

    /// Human-readable report: header, timeline and compact notation.
    pub fn report(&self) -> String {
        let file_name = Path::new(&self.file_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.clone());
        let rule = "-".repeat(RULE_WIDTH);

        let mut lines = vec![
            "Sargam Transcription".to_string(),
            format!("File: {}", file_name),
            format!("Duration: {:.2} seconds", self.duration),
            format!("Base Sa: {:.2} Hz", self.base_frequency),
            rule.clone(),
        ];

        if self.is_empty() {
            lines.push("No clear notes detected in the audio.".to_string());
        } else {
            lines.push("Timeline:".to_string());
            lines.extend(self.timeline());
        }

        lines.push(rule);
        lines.push("Compact Notation:".to_string());
        lines.push(self.compact_notation());

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sargam::profile::build_profile;

    fn segment(note: &str, start: f64, end: f64) -> NoteSegment {
        NoteSegment {
            note: note.parse().unwrap(),
            start_time: start,
            end_time: end,
            duration: end - start,
        }
    }

    pub(crate) fn sample() -> Transcription {
        Transcription::new(
            Path::new("/recordings/alaap.wav"),
            3.5,
            &build_profile(261.63),
            vec![
                segment("Sa", 0.0, 1.0),
                segment("Re♭", 1.25, 2.0),
                segment("Pa₊", 2.5, 3.25),
            ],
            RawTrace {
                times: vec![0.0, 0.5, 1.0],
                frequencies: vec![261.0, 0.0, 280.5],
                sargam_sequence: vec![Some("Sa".parse().unwrap()), None, Some("Re♭".parse().unwrap())],
            },
        )
    }

    #[test]
    fn compact_notation_joins_labels() {
        assert_eq!(sample().compact_notation(), "Sa Re♭ Pa₊");
    }

    #[test]
    fn timeline_uses_fixed_formatting() {
        let lines = sample().timeline();
        assert_eq!(lines[0], "  0.00s -   1.00s:   Sa (1.00s)");
        assert_eq!(lines[1], "  1.25s -   2.00s:  Re♭ (0.75s)");
        assert_eq!(lines[2], "  2.50s -   3.25s:  Pa₊ (0.75s)");
    }

    #[test]
    fn report_has_header_timeline_and_notation() {
        let text = sample().report();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Sargam Transcription");
        assert_eq!(lines[1], "File: alaap.wav");
        assert_eq!(lines[2], "Duration: 3.50 seconds");
        assert_eq!(lines[3], "Base Sa: 261.63 Hz");
        assert_eq!(lines[5], "Timeline:");
        assert_eq!(lines[lines.len() - 2], "Compact Notation:");
        assert_eq!(lines[lines.len() - 1], "Sa Re♭ Pa₊");
    }

    #[test]
    fn empty_report_is_not_an_error() {
        let mut t = sample();
        t.note_segments.clear();
        assert!(t.is_empty());
        assert_eq!(t.compact_notation(), "");
        assert!(t.timeline().is_empty());
        assert!(t.report().contains("No clear notes detected in the audio."));
    }

    #[test]
    fn records_tonic_from_profile() {
        assert_eq!(sample().base_frequency, f64::from(261.63f32));
    }
}
