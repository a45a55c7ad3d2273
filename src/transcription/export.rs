use std::path::Path;

use super::Transcription;
use crate::error::Result;

impl Transcription {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Transcription saved to {}", path.display());
        Ok(())
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write the text report, or only the compact notation when `notes_only`.
    pub fn save_text(&self, path: &Path, notes_only: bool) -> Result<()> {
        let text = if notes_only {
            self.compact_notation()
        } else {
            self.report()
        };
        std::fs::write(path, text)?;
        log::info!("Text transcription saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::tests::sample;

    #[test]
    fn json_round_trip_preserves_segments() {
        let original = sample();
        let restored = Transcription::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(restored.note_segments, original.note_segments);
        assert_eq!(restored, original);
    }

    #[test]
    fn json_uses_record_field_names() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(value["file_path"], "/recordings/alaap.wav");
        assert_eq!(value["note_segments"][1]["note"], "Re♭");
        assert!(value["note_segments"][0]["start_time"].is_number());
        assert!(value["raw_data"]["sargam_sequence"][1].is_null());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn reads_records_with_naive_timestamps() {
        let json = r#"{
            "file_path": "take1.wav",
            "duration": 2.0,
            "base_frequency": 261.63,
            "timestamp": "2024-05-01T10:15:30.123456",
            "note_segments": [
                {"note": "Sa", "start_time": 0.0, "end_time": 1.9, "duration": 1.9}
            ],
            "raw_data": {"times": [0.0], "frequencies": [262.5], "sargam_sequence": ["Sa"]}
        }"#;
        let t = Transcription::from_json(json).unwrap();
        assert_eq!(t.compact_notation(), "Sa");
        assert_eq!(t.timestamp.to_string(), "2024-05-01 10:15:30.123456");
    }

    #[test]
    fn reserializing_keeps_double_precision() {
        let json = r#"{
            "file_path": "take2.wav",
            "duration": 3.0471655328798186,
            "base_frequency": 261.6255653005986,
            "timestamp": "2024-05-01T10:15:30",
            "note_segments": [
                {"note": "Sa", "start_time": 0.023219954648526078, "end_time": 1.0216780045351474, "duration": 0.9984580498866213}
            ],
            "raw_data": {"times": [0.023219954648526078], "frequencies": [262.5000001], "sargam_sequence": ["Sa"]}
        }"#;
        let loaded = Transcription::from_json(json).unwrap();
        let saved: serde_json::Value = serde_json::from_str(&loaded.to_json().unwrap()).unwrap();
        let close = |v: &serde_json::Value, expected: f64| {
            let got = v.as_f64().unwrap();
            assert!((got - expected).abs() < 1e-12, "{} != {}", got, expected);
        };
        close(&saved["duration"], 3.0471655328798186);
        close(&saved["base_frequency"], 261.6255653005986);
        close(&saved["note_segments"][0]["end_time"], 1.0216780045351474);
        close(&saved["raw_data"]["times"][0], 0.023219954648526078);
        close(&saved["raw_data"]["frequencies"][0], 262.5000001);
    }

    #[test]
    fn rejects_unknown_labels() {
        let json = r#"{
            "file_path": "x.wav", "duration": 1.0, "base_frequency": 200.0,
            "timestamp": "2024-05-01T10:15:30",
            "note_segments": [{"note": "Do", "start_time": 0.0, "end_time": 1.0, "duration": 1.0}],
            "raw_data": {"times": [], "frequencies": [], "sargam_sequence": []}
        }"#;
        assert!(Transcription::from_json(json).is_err());
    }

    #[test]
    fn saves_and_loads_files() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("out.json");
        let text_path = dir.path().join("out.txt");
        let notes_path = dir.path().join("notes.txt");

        let t = sample();
        t.save_json(&json_path).unwrap();
        t.save_text(&text_path, false).unwrap();
        t.save_text(&notes_path, true).unwrap();

        assert_eq!(Transcription::load_json(&json_path).unwrap(), t);
        assert!(std::fs::read_to_string(&text_path).unwrap().starts_with("Sargam Transcription"));
        assert_eq!(std::fs::read_to_string(&notes_path).unwrap(), "Sa Re♭ Pa₊");
    }
}
