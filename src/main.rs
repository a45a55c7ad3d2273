mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use cli::Cli;
use sargam::config::{self, AnalysisConfig};
use sargam::{Label, Transcriber, Transcription};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect sargam.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = PathBuf::from("sargam.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("sargam").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("sargam").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        let cfg = config::load_config(path)?;
        log::info!("Loaded config from {}", path.display());
        merge_file_config(&mut cli, cfg);
    }

    let mut transcriber = Transcriber::new(analysis_config(&cli)).context("Rejected settings")?;

    if let Some(ref reference) = cli.reference {
        let note: Label = cli
            .reference_note
            .parse()
            .with_context(|| format!("Invalid --reference-note '{}'", cli.reference_note))?;
        log::info!("Calibrating tonic from {} (holding {})", reference.display(), note);
        match transcriber.calibrate_from_file(reference, note)? {
            Some(tonic) => log::info!("Base frequency set to {:.2}Hz", tonic),
            None => log::warn!("Could not detect a pitch in {}", reference.display()),
        }
    }

    if cli.list_notes {
        println!("Sa = {:.2} Hz", transcriber.profile().tonic());
        for (label, freq) in transcriber.profile().entries() {
            println!("  {:<5} {:8.2} Hz", label.to_string(), freq);
        }
        return Ok(());
    }

    if cli.inputs.is_empty() {
        anyhow::bail!("At least one input audio file is required");
    }

    let pb = ProgressBar::new(cli.inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")
            .context("Invalid progress template")?
            .progress_chars("=>-"),
    );

    // Each file is an independent analysis; the pipeline itself is single-threaded.
    let results: Vec<(PathBuf, sargam::Result<Transcription>)> = cli
        .inputs
        .par_iter()
        .map(|input| {
            let result = transcriber.transcribe_file(input);
            pb.inc(1);
            (input.clone(), result)
        })
        .collect();

    pb.finish_and_clear();

    let multiple = results.len() > 1;
    let mut failures = 0;

    for (input, result) in results {
        let transcription = match result {
            Ok(t) => t,
            Err(err) => {
                log::error!("{}", err);
                failures += 1;
                continue;
            }
        };

        match cli.output {
            Some(ref output) => {
                let path = output_path_for(output, &input, multiple);
                write_output(&transcription, &path, cli.notes_only)?;
            }
            None if cli.notes_only => println!("{}", transcription.compact_notation()),
            None => println!("{}\n", transcription.report()),
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} files could not be transcribed", failures, cli.inputs.len());
    }
    Ok(())
}

/// Config values apply only where the CLI flag was left at its default.
fn merge_file_config(cli: &mut Cli, cfg: config::Config) {
    let defaults = AnalysisConfig::default();
    let file = cfg.analysis;
    if cli.tonic == defaults.tonic { cli.tonic = file.tonic; }
    if cli.tolerance == defaults.tolerance { cli.tolerance = file.tolerance; }
    if cli.min_duration == defaults.min_note_duration { cli.min_duration = file.min_note_duration; }
    if cli.frame_length == defaults.frame_length { cli.frame_length = file.frame_length; }
    if cli.hop_length == defaults.hop_length { cli.hop_length = file.hop_length; }
    if cli.fmin == defaults.fmin { cli.fmin = file.fmin; }
    if cli.fmax == defaults.fmax { cli.fmax = file.fmax; }
    if cli.smoothing == defaults.smoothing_window { cli.smoothing = file.smoothing_window; }
    if cli.sample_rate == defaults.sample_rate { cli.sample_rate = file.sample_rate; }
    if !cli.notes_only { cli.notes_only = cfg.output.notes_only; }
}

fn analysis_config(cli: &Cli) -> AnalysisConfig {
    AnalysisConfig {
        tonic: cli.tonic,
        tolerance: cli.tolerance,
        min_note_duration: cli.min_duration,
        frame_length: cli.frame_length,
        hop_length: cli.hop_length,
        fmin: cli.fmin,
        fmax: cli.fmax,
        smoothing_window: cli.smoothing,
        sample_rate: cli.sample_rate,
    }
}

/// With several inputs, `out.json` becomes `out-<input stem>.json`.
fn output_path_for(output: &Path, input: &Path, multiple: bool) -> PathBuf {
    if !multiple {
        return output.to_path_buf();
    }
    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("transcription");
    let input_stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("input");
    let name = match output.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}.{}", stem, input_stem, ext),
        None => format!("{}-{}", stem, input_stem),
    };
    output.with_file_name(name)
}

fn write_output(transcription: &Transcription, path: &Path, notes_only: bool) -> Result<()> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        transcription
            .save_json(path)
            .with_context(|| format!("Failed to write {}", path.display()))
    } else {
        transcription
            .save_text(path, notes_only)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_output_path_is_kept() {
        let p = output_path_for(Path::new("out/result.json"), Path::new("a/take1.wav"), false);
        assert_eq!(p, PathBuf::from("out/result.json"));
    }

    #[test]
    fn multiple_outputs_get_input_stem() {
        let p = output_path_for(Path::new("out/result.json"), Path::new("a/take1.wav"), true);
        assert_eq!(p, PathBuf::from("out/result-take1.json"));
        let p = output_path_for(Path::new("notes"), Path::new("b.mp3"), true);
        assert_eq!(p, PathBuf::from("notes-b"));
    }

    #[test]
    fn file_config_fills_defaults_only() {
        let mut cli = Cli::parse_from(["sargam", "in.wav", "--tolerance", "20"]);
        let cfg: config::Config = toml::from_str(
            "[analysis]\ntonic = 220.0\ntolerance = 35.0\n[output]\nnotes_only = true\n",
        )
        .unwrap();
        merge_file_config(&mut cli, cfg);
        assert_eq!(cli.tonic, 220.0);
        assert_eq!(cli.tolerance, 20.0);
        assert!(cli.notes_only);
        assert!(Transcriber::new(analysis_config(&cli)).is_ok());
    }
}
