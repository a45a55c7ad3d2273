use anyhow::Context;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{Error, Result};

/// Mono PCM in [-1, 1] at a fixed rate. Immutable once decoded.
#[derive(Clone, Debug)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }
}

#[derive(Debug)]
pub struct AudioData {
    pub pcm: PcmBuffer,
    /// Duration of the source at its native rate, in seconds
    pub duration: f64,
}

/// Decode any supported file to mono PCM at `target_rate`.
pub fn decode_audio(path: &Path, target_rate: u32) -> Result<AudioData> {
    decode_file(path, target_rate).map_err(|e| Error::decode(path, e))
}

fn decode_file(path: &Path, target_rate: u32) -> anyhow::Result<AudioData> {
    let file = std::fs::File::open(path).context("Failed to open audio file")?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut mono: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(err)) => {
                log::debug!("Skipping corrupt packet: {}", err);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();

        if channels == 1 {
            mono.extend_from_slice(samples);
        } else {
            for frame_samples in samples.chunks(channels) {
                mono.push(frame_samples.iter().sum::<f32>() / channels as f32);
            }
        }
    }

    let duration = mono.len() as f64 / f64::from(sample_rate);

    log::info!(
        "Decoded {}: {} samples, {}Hz, {:.2}s",
        path.display(),
        mono.len(),
        sample_rate,
        duration
    );

    let samples = resample(&mono, sample_rate, target_rate)?;

    Ok(AudioData {
        pcm: PcmBuffer::new(samples, target_rate),
        duration,
    })
}

/// Resample mono f32 audio from `from_rate` to `to_rate` using rubato.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> anyhow::Result<Vec<f32>> {
    use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};

    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    log::debug!("Resampling {}Hz -> {}Hz", from_rate, to_rate);

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, samples.len(), 1)
        .context("Failed to create resampler")?;

    let input = vec![samples.to_vec()];
    let mut out = resampler
        .process(&input, None)
        .context("Resampling failed")?
        .into_iter()
        .next()
        .unwrap_or_default();

    // Flush the filter tail, then drop the leading delay so t=0 lines up.
    let tail = resampler
        .process_partial(None::<&[Vec<f32>]>, None)
        .context("Resampling failed")?;
    if let Some(tail) = tail.into_iter().next() {
        out.extend(tail);
    }

    let delay = resampler.output_delay().min(out.len());
    let expected = (samples.len() as f64 * ratio).round() as usize;
    let mut aligned = out.split_off(delay);
    aligned.truncate(expected);
    Ok(aligned)
}
