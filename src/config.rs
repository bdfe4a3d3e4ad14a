//! Audio output settings.

use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_SAMPLE_RATE: u32 = 48000;
pub const DEFAULT_CHANNELS: u16 = 1;
pub const DEFAULT_LATENCY: Duration = Duration::from_micros(500_000);

/// How the output device gets opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConfig {
    /// Samples per second delivered to the device.
    pub sample_rate: u32,
    /// Channels the synthesized samples are counted against.
    /// Tones are always mono, so this is 1 unless overridden.
    pub channels: u16,
    /// How much audio may be queued ahead of the device.
    pub latency: Duration,
    /// Name of the output device, `None` for the host default.
    pub device: Option<String>,
}

impl AudioConfig {
    pub fn new(sample_rate: u32) -> Result<Self> {
        Self::default().sample_rate(sample_rate)
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidArgument("sample rate must be above zero".into()));
        }

        self.sample_rate = sample_rate;
        Ok(self)
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn device(mut self, device: Option<String>) -> Self {
        self.device = device;
        self
    }

    /// Number of frames that fit in the latency window.
    pub fn latency_frames(&self) -> usize {
        ((self.sample_rate as f64 * self.latency.as_secs_f64()) as usize).max(1)
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            latency: DEFAULT_LATENCY,
            device: None,
        }
    }
}
