use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44100;
const CHIME_MS: u64 = 700;
const BASE_FREQ: f32 = 880.0;

/// Synthesized alert chime: a short sine burst with an exponential decay
/// envelope. Finite, so the sink drains when it ends and the completion
/// callback can fire.
pub struct AlertChime {
    num_sample: usize,
    total_samples: usize,
}

impl AlertChime {
    pub fn new() -> Self {
        Self {
            num_sample: 0,
            total_samples: (SAMPLE_RATE as u64 * CHIME_MS / 1000) as usize,
        }
    }
}

impl Default for AlertChime {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for AlertChime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        self.num_sample += 1;

        let t = self.num_sample as f32 / SAMPLE_RATE as f32;
        let envelope = (-6.0 * t).exp();
        let sample = (2.0 * PI * BASE_FREQ * t).sin() * envelope;

        Some(sample * 0.25) // Lower amplitude to prevent clipping
    }
}

impl Source for AlertChime {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(CHIME_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chime_is_finite_and_bounded() {
        let samples: Vec<f32> = AlertChime::new().collect();
        assert_eq!(samples.len(), (44100 * 700 / 1000) as usize);
        assert!(samples.iter().all(|s| s.abs() <= 0.25));
    }

    #[test]
    fn chime_decays_toward_silence() {
        let samples: Vec<f32> = AlertChime::new().collect();
        let head: f32 = samples[..1000].iter().map(|s| s.abs()).sum();
        let tail: f32 = samples[samples.len() - 1000..].iter().map(|s| s.abs()).sum();
        assert!(tail < head / 10.0);
    }
}
