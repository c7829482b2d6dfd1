use super::error::AudioError;
use std::time::Duration;

/// Both providers deliver signed 16-bit little-endian PCM at this rate
pub const PCM_SAMPLE_RATE: u32 = 24_000;
pub const PCM_CHANNELS: u16 = 1;

/// Decoded, ready-to-play audio
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

impl AudioClip {
    /// Decode raw s16le PCM as returned by the speech providers
    pub fn from_pcm16le(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<Self, AudioError> {
        if bytes.is_empty() {
            return Err(AudioError::SynthesisRejected(
                "Provider returned no audio".to_string(),
            ));
        }

        if bytes.len() % 2 != 0 {
            return Err(AudioError::SynthesisRejected(format!(
                "Malformed PCM payload: {} bytes is not a whole number of samples",
                bytes.len()
            )));
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self {
            samples,
            sample_rate,
            channels: channels.max(1),
        })
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Memory held by the decoded samples, used for the cache byte budget
    pub fn size_bytes(&self) -> usize {
        self.samples.len() * std::mem::size_of::<i16>()
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() / self.channels as usize;
        Duration::from_secs_f64(frames as f64 / self.sample_rate as f64)
    }

    /// Re-encode for transport to the front-end
    pub fn to_pcm16le(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}
