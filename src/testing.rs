//! Synthetic signals for unit tests.

use crate::audio::decode::PcmBuffer;

pub const SR: u32 = 22050;

pub fn sine(freq: f32, secs: f32) -> PcmBuffer {
    let n = (SR as f32 * secs).round() as usize;
    let samples = (0..n)
        .map(|i| 0.5 * (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin())
        .collect();
    PcmBuffer::new(samples, SR)
}

pub fn silence(secs: f32) -> PcmBuffer {
    PcmBuffer::new(vec![0.0; (SR as f32 * secs).round() as usize], SR)
}

pub fn concat(parts: &[PcmBuffer]) -> PcmBuffer {
    let samples = parts.iter().flat_map(|p| p.samples.iter().copied()).collect();
    PcmBuffer::new(samples, SR)
}
