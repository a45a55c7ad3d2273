use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The seven scale degrees, Sa through Ni.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Degree {
    Sa,
    Re,
    Ga,
    Ma,
    Pa,
    Dha,
    Ni,
}

impl Degree {
    pub const ALL: [Degree; 7] = [
        Degree::Sa,
        Degree::Re,
        Degree::Ga,
        Degree::Ma,
        Degree::Pa,
        Degree::Dha,
        Degree::Ni,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Degree::Sa => "Sa",
            Degree::Re => "Re",
            Degree::Ga => "Ga",
            Degree::Ma => "Ma",
            Degree::Pa => "Pa",
            Degree::Dha => "Dha",
            Degree::Ni => "Ni",
        }
    }

    /// Just-intonation ratio of the shuddha form.
    pub fn shuddha_ratio(self) -> f32 {
        match self {
            Degree::Sa => 1.0,
            Degree::Re => 9.0 / 8.0,
            Degree::Ga => 5.0 / 4.0,
            Degree::Ma => 4.0 / 3.0,
            Degree::Pa => 3.0 / 2.0,
            Degree::Dha => 5.0 / 3.0,
            Degree::Ni => 15.0 / 8.0,
        }
    }

    /// Ratio of the komal form; only Re, Ga, Dha and Ni have one.
    pub fn komal_ratio(self) -> Option<f32> {
        match self {
            Degree::Re => Some(16.0 / 15.0),
            Degree::Ga => Some(6.0 / 5.0),
            Degree::Dha => Some(8.0 / 5.0),
            Degree::Ni => Some(9.0 / 5.0),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Octave {
    Lower,
    Middle,
    Upper,
}

impl Octave {
    pub const ALL: [Octave; 3] = [Octave::Lower, Octave::Middle, Octave::Upper];

    pub fn multiplier(self) -> f32 {
        match self {
            Octave::Lower => 0.5,
            Octave::Middle => 1.0,
            Octave::Upper => 2.0,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Octave::Lower => "₋",
            Octave::Middle => "",
            Octave::Upper => "₊",
        }
    }
}

/// A sargam note: degree, shuddha/komal variant and octave.
///
/// Renders as e.g. `Sa`, `Re♭`, `Ni₋`, `Ga♭₊`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label {
    degree: Degree,
    komal: bool,
    octave: Octave,
}

impl Label {
    pub fn shuddha(degree: Degree, octave: Octave) -> Self {
        Self { degree, komal: false, octave }
    }

    /// `None` for degrees without a komal form.
    pub fn komal(degree: Degree, octave: Octave) -> Option<Self> {
        degree.komal_ratio().map(|_| Self { degree, komal: true, octave })
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    pub fn is_komal(&self) -> bool {
        self.komal
    }

    pub fn octave(&self) -> Octave {
        self.octave
    }

    /// Ratio to the tonic, octave multiplier included.
    pub fn ratio(&self) -> f32 {
        let base = if self.komal {
            self.degree.komal_ratio().unwrap_or(1.0)
        } else {
            self.degree.shuddha_ratio()
        };
        base * self.octave.multiplier()
    }

    /// The full closed vocabulary: every shuddha and komal form in every octave.
    pub fn all() -> Vec<Label> {
        let mut labels = Vec::with_capacity(33);
        for octave in Octave::ALL {
            for degree in Degree::ALL {
                labels.push(Label::shuddha(degree, octave));
            }
            for degree in Degree::ALL {
                if let Some(label) = Label::komal(degree, octave) {
                    labels.push(label);
                }
            }
        }
        labels
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.degree.name())?;
        if self.komal {
            f.write_str("♭")?;
        }
        f.write_str(self.octave.suffix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sargam label '{0}'")]
pub struct ParseLabelError(pub String);

impl FromStr for Label {
    type Err = ParseLabelError;

    /// Accepts the rendered form, plus ASCII `b`, `-` and `+` for ♭, ₋ and ₊.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseLabelError(s.to_string());
        let trimmed = s.trim();

        let degree = Degree::ALL
            .into_iter()
            .find(|d| trimmed.starts_with(d.name()))
            .ok_or_else(err)?;
        let mut rest = &trimmed[degree.name().len()..];

        let komal = if let Some(r) = rest.strip_prefix('♭').or_else(|| rest.strip_prefix('b')) {
            rest = r;
            true
        } else {
            false
        };

        let octave = match rest {
            "" => Octave::Middle,
            "₋" | "-" => Octave::Lower,
            "₊" | "+" => Octave::Upper,
            _ => return Err(err()),
        };

        if komal {
            Label::komal(degree, octave).ok_or_else(err)
        } else {
            Ok(Label::shuddha(degree, octave))
        }
    }
}

impl TryFrom<String> for Label {
    type Error = ParseLabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.to_string()
    }
}
