use super::label::Label;

/// Immutable label → frequency table for one tonic.
///
/// Entries are kept sorted by ascending frequency; nearest-label search relies
/// on that order for its tie-break. A new tonic means a new profile.
#[derive(Clone, Debug, PartialEq)]
pub struct TonalProfile {
    tonic: f32,
    entries: Vec<(Label, f32)>,
}

/// Build the full profile for `tonic` (Hz): tonic × ratio × octave multiplier.
pub fn build_profile(tonic: f32) -> TonalProfile {
    let mut entries: Vec<(Label, f32)> = Label::all()
        .into_iter()
        .map(|label| (label, tonic * label.ratio()))
        .collect();
    entries.sort_by(|a, b| a.1.total_cmp(&b.1));

    log::debug!("Built tonal profile: tonic={:.2}Hz, {} labels", tonic, entries.len());

    TonalProfile { tonic, entries }
}

impl TonalProfile {
    pub fn tonic(&self) -> f32 {
        self.tonic
    }

    /// All (label, frequency) pairs, lowest frequency first.
    pub fn entries(&self) -> &[(Label, f32)] {
        &self.entries
    }

    pub fn frequency_of(&self, label: Label) -> Option<f32> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|&(_, f)| f)
    }
}

/// Estimate the tonic from raw (unquantized) frequencies of a recording known
/// to hold `reference`: median of the voiced frequencies divided by the
/// reference's ratio. `None` if no frame is voiced.
pub fn estimate_tonic(frequencies: &[f32], reference: Label) -> Option<f32> {
    let mut voiced: Vec<f32> = frequencies
        .iter()
        .copied()
        .filter(|f| f.is_finite() && *f > 0.0)
        .collect();
    if voiced.is_empty() {
        return None;
    }
    voiced.sort_by(f32::total_cmp);

    let mid = voiced.len() / 2;
    let median = if voiced.len() % 2 == 0 {
        (voiced[mid - 1] + voiced[mid]) / 2.0
    } else {
        voiced[mid]
    };

    Some(median / reference.ratio())
}
