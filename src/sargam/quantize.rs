use super::label::Label;
use super::profile::TonalProfile;

/// Nearest label to `frequency`, if it lies within `tolerance` Hz.
///
/// Non-positive frequencies (unvoiced frames) never match. When two labels are
/// equally close the lower-frequency one wins.
pub fn quantize(frequency: f32, profile: &TonalProfile, tolerance: f32) -> Option<Label> {
    if frequency.is_nan() || frequency <= 0.0 {
        return None;
    }
    let (label, label_freq) = nearest(profile.entries(), frequency)?;
    if (frequency - label_freq).abs() <= tolerance {
        Some(label)
    } else {
        None
    }
}

/// Quantize a whole contour frame by frame.
pub fn quantize_sequence(
    frequencies: &[f32],
    profile: &TonalProfile,
    tolerance: f32,
) -> Vec<Option<Label>> {
    let labels: Vec<Option<Label>> = frequencies
        .iter()
        .map(|&f| quantize(f, profile, tolerance))
        .collect();

    let matched = labels.iter().filter(|l| l.is_some()).count();
    log::info!(
        "Quantization: {}/{} frames matched (tolerance {:.1}Hz)",
        matched,
        labels.len(),
        tolerance
    );

    labels
}

/// Ordered by distance, then by label frequency. Independent of entry order.
fn nearest(entries: &[(Label, f32)], frequency: f32) -> Option<(Label, f32)> {
    entries.iter().copied().min_by(|a, b| {
        let da = (frequency - a.1).abs();
        let db = (frequency - b.1).abs();
        da.total_cmp(&db).then(a.1.total_cmp(&b.1))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sargam::label::{Degree, Octave};
    use crate::sargam::profile::build_profile;

    fn label(s: &str) -> Label {
        s.parse().unwrap()
    }

    #[test]
    fn tonic_quantizes_to_sa() {
        for tonic in [55.0f32, 130.81, 196.0, 261.63, 440.0, 1000.0] {
            let profile = build_profile(tonic);
            assert_eq!(quantize(tonic, &profile, 50.0), Some(label("Sa")), "tonic {}", tonic);
        }
    }

    #[test]
    fn unvoiced_never_matches() {
        let profile = build_profile(261.63);
        assert_eq!(quantize(0.0, &profile, 1e6), None);
        assert_eq!(quantize(-10.0, &profile, 1e6), None);
        assert_eq!(quantize(f32::NAN, &profile, 1e6), None);
    }

    #[test]
    fn picks_nearest_label() {
        let profile = build_profile(261.63);
        assert_eq!(quantize(294.0, &profile, 50.0), Some(label("Re")));
        assert_eq!(quantize(392.4, &profile, 50.0), Some(label("Pa")));
        assert_eq!(quantize(131.0, &profile, 50.0), Some(label("Sa₋")));
        assert_eq!(quantize(523.0, &profile, 50.0), Some(label("Sa₊")));
        assert_eq!(quantize(279.0, &profile, 50.0), Some(label("Re♭")));
    }

    #[test]
    fn outside_tolerance_is_none() {
        let profile = build_profile(261.63);
        // well above Ni₊ (~981 Hz)
        assert_eq!(quantize(1500.0, &profile, 50.0), None);
        assert_eq!(quantize(265.0, &profile, 1.0), None);
        assert_eq!(quantize(265.0, &profile, 3.5), Some(label("Sa")));
    }

    #[test]
    fn tolerance_is_monotonic() {
        let profile = build_profile(240.0);
        for f in (60..1200).step_by(7).map(|f| f as f32 + 0.37) {
            let mut matched: Option<Label> = None;
            for tol in [0.5f32, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0] {
                let got = quantize(f, &profile, tol);
                if let Some(prev) = matched {
                    assert_eq!(got, Some(prev), "{} Hz lost its match at tolerance {}", f, tol);
                }
                matched = matched.or(got);
            }
        }
    }

    #[test]
    fn ties_prefer_lower_frequency() {
        let low = Label::shuddha(Degree::Sa, Octave::Middle);
        let high = Label::shuddha(Degree::Ga, Octave::Middle);
        let forward = [(low, 200.0f32), (high, 250.0)];
        let reversed = [(high, 250.0f32), (low, 200.0)];
        assert_eq!(nearest(&forward, 225.0), Some((low, 200.0)));
        assert_eq!(nearest(&reversed, 225.0), Some((low, 200.0)));
    }

    #[test]
    fn sequence_keeps_length() {
        let profile = build_profile(261.63);
        let labels = quantize_sequence(&[0.0, 261.63, 2000.0, 392.0], &profile, 50.0);
        assert_eq!(labels, vec![None, Some(label("Sa")), None, Some(label("Pa"))]);
    }
}
