use serde::{Deserialize, Serialize};

use super::label::Label;

/// A held note: one label over a contiguous time span.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteSegment {
    pub note: Label,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
}

/// Collapse per-frame labels into note segments.
///
/// A run ends where the label changes (to another label or to/from `None`)
/// and spans `[run start, time of the first differing frame)`. Runs without a
/// label, or shorter than `min_duration`, are dropped, never merged into a
/// neighbour. The final run ends at the last frame's own timestamp, so it
/// comes out one hop shorter than a look-ahead boundary would give.
pub fn build_segments(
    times: &[f64],
    labels: &[Option<Label>],
    min_duration: f32,
) -> Vec<NoteSegment> {
    let n = times.len().min(labels.len());
    if n == 0 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut current = labels[0];
    let mut run_start = times[0];

    for i in 1..n {
        if labels[i] != current {
            close_run(&mut segments, current, run_start, times[i], min_duration);
            current = labels[i];
            run_start = times[i];
        }
    }
    close_run(&mut segments, current, run_start, times[n - 1], min_duration);

    log::info!(
        "Segmentation: {} frames -> {} notes (min {:.2}s)",
        n,
        segments.len(),
        min_duration
    );

    segments
}

fn close_run(
    segments: &mut Vec<NoteSegment>,
    label: Option<Label>,
    start: f64,
    end: f64,
    min_duration: f32,
) {
    let Some(note) = label else {
        return;
    };
    let duration = end - start;
    if duration > 0.0 && duration >= f64::from(min_duration) {
        segments.push(NoteSegment {
            note,
            start_time: start,
            end_time: end,
            duration,
        });
    } else {
        log::debug!("Dropping {} at {:.3}s ({:.3}s)", note, start, duration);
    }
}
