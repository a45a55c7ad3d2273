use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sargam", about = "Transcribe monophonic recordings to sargam notation")]
pub struct Cli {
    /// Input audio files (WAV, MP3, FLAC, OGG, AAC)
    pub inputs: Vec<PathBuf>,

    /// Output file. `.json` writes the full record, anything else the text
    /// report. With several inputs, the input's stem is appended.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to ./sargam.toml, then the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frequency of Sa in Hz
    #[arg(long, default_value_t = 261.63)]
    pub tonic: f32,

    /// Match tolerance in Hz
    #[arg(long, default_value_t = 50.0)]
    pub tolerance: f32,

    /// Minimum note duration in seconds
    #[arg(long, default_value_t = 0.1)]
    pub min_duration: f32,

    /// Analysis frame length in samples
    #[arg(long, default_value_t = 2048)]
    pub frame_length: usize,

    /// Hop between frames in samples
    #[arg(long, default_value_t = 512)]
    pub hop_length: usize,

    /// Lowest pitch searched, Hz
    #[arg(long, default_value_t = 80.0)]
    pub fmin: f32,

    /// Highest pitch searched, Hz
    #[arg(long, default_value_t = 2000.0)]
    pub fmax: f32,

    /// Median / moving-average window (odd)
    #[arg(long, default_value_t = 5)]
    pub smoothing: usize,

    /// Analysis sample rate in Hz
    #[arg(long, default_value_t = 22050)]
    pub sample_rate: u32,

    /// Reference recording used to estimate the tonic before transcribing
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Note the reference recording holds (e.g. Sa, Pa, Re♭, Ga-)
    #[arg(long, default_value = "Sa")]
    pub reference_note: String,

    /// Only print / save the compact notation
    #[arg(long)]
    pub notes_only: bool,

    /// List every label and its frequency for the tonic and exit
    #[arg(long)]
    pub list_notes: bool,
}
