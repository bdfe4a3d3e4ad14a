//! Bent sine tone synthesis.
//! The pitch dips by the bend amount towards the middle of every buffer and
//! comes back up by its end, so a buffer repeated N times bends N times.

use std::{f64::consts::PI, ops::Deref};

/// Length of the synthesis buffer, one second of audio at 48kHz.
pub const BUF_LEN: usize = 48000;

/// Fixed size block of samples.
/// Overwritten by every call to [`ToneSynthesizer::synthesize`].
pub struct SampleBuffer {
    samples: Box<[f32]>,
}

/// Iterator over the samples of one buffer length of a bent tone.
#[derive(Clone, Copy, Debug)]
pub struct BentTone {
    i: usize,
    len: usize,
    frequency: f64,
    bend: f64,
    sample_rate: f64,
}

/// Owns the one reusable [`SampleBuffer`] and fills it with tones.
pub struct ToneSynthesizer {
    buffer: SampleBuffer,
    sample_rate: u32,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self {
            samples: vec![0.0; BUF_LEN].into_boxed_slice(),
        }
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for SampleBuffer {
    type Target = [f32];

    fn deref(&self) -> &Self::Target {
        &self.samples
    }
}

impl BentTone {
    pub fn new(frequency: f32, bend: f32, sample_rate: u32, len: usize) -> Self {
        Self {
            i: 0,
            len,
            frequency: frequency as f64,
            bend: bend as f64,
            sample_rate: sample_rate as f64,
        }
    }

    /// Frequency deviation in Hz at sample `i`.
    /// Zero at both ends of the buffer and `-bend` at its midpoint.
    pub fn offset(&self, i: usize) -> f64 {
        let tau = i as f64 / self.len as f64;
        self.bend * 4.0 * tau * (tau - 1.0)
    }

    fn sample(&self, i: usize) -> f32 {
        let offset = self.offset(i);
        (2.0 * PI * i as f64 * (offset + self.frequency) / self.sample_rate).sin() as f32
    }
}

impl Iterator for BentTone {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.i >= self.len {
            return None;
        }

        let out = self.sample(self.i);
        self.i += 1;
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.len - self.i;
        (left, Some(left))
    }
}

impl ExactSizeIterator for BentTone {}

impl ToneSynthesizer {
    pub fn new(sample_rate: u32) -> Self {
        debug_assert!(sample_rate > 0, "sample rate must be above zero");
        Self {
            buffer: SampleBuffer::new(),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Refills the buffer with a tone at `frequency` bent by `bend` Hz.
    pub fn synthesize(&mut self, frequency: f32, bend: f32) -> &SampleBuffer {
        let tone = BentTone::new(frequency, bend, self.sample_rate, BUF_LEN);
        for (sample, value) in self.buffer.samples.iter_mut().zip(tone) {
            *sample = value;
        }

        &self.buffer
    }
}

#[cfg(test)]
mod test {
    use std::f64::consts::PI;

    use super::{BentTone, ToneSynthesizer, BUF_LEN};

    #[test]
    fn test_bend_offset_shape() {
        let tone = BentTone::new(440.0, 26.0, 48000, BUF_LEN);

        assert_eq!(tone.offset(0), 0.0);
        assert!((tone.offset(BUF_LEN / 2) + 26.0).abs() < 1e-9);
        assert!(tone.offset(BUF_LEN - 1).abs() < 0.01);
        assert!(tone.offset(BUF_LEN / 4) > tone.offset(BUF_LEN / 2));
    }

    #[test]
    fn test_midpoint_sample_uses_bent_frequency() {
        let mut synth = ToneSynthesizer::new(48000);
        let buf = synth.synthesize(440.0, 26.0);

        let i = BUF_LEN / 2;
        let expected = (2.0 * PI * i as f64 * (440.0 - 26.0) / 48000.0).sin() as f32;
        assert!((buf[i] - expected).abs() < 1e-4);
    }

    #[test]
    fn test_no_bend_is_plain_sine() {
        let mut synth = ToneSynthesizer::new(48000);
        let buf = synth.synthesize(1000.0, 0.0);

        assert_eq!(buf.len(), BUF_LEN);
        assert_eq!(buf[0], 0.0);
        for i in [1, 12, 100, 31337] {
            let expected = (2.0 * PI * i as f64 * 1000.0 / 48000.0).sin() as f32;
            assert!((buf[i] - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_buffer_overwritten() {
        let mut synth = ToneSynthesizer::new(48000);
        let first = synth.synthesize(440.0, 0.0)[1];
        let second = synth.synthesize(880.0, 0.0)[1];

        assert_ne!(first, second);
        assert_eq!(synth.synthesize(440.0, 0.0)[1], first);
    }

    #[test]
    fn test_samples_stay_in_unit_range() {
        let mut synth = ToneSynthesizer::new(44100);
        let buf = synth.synthesize(523.25, 100.0);
        assert!(buf.iter().all(|x| (-1.0..=1.0).contains(x)));
    }

    #[test]
    fn test_bent_tone_length() {
        let tone = BentTone::new(440.0, 26.0, 48000, 10);
        assert_eq!(tone.len(), 10);
        assert_eq!(tone.count(), 10);
    }
}
