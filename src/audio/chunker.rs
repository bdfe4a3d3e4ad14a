//! Splits a tone of any duration into writes of whole buffers plus one leftover.

use log::{debug, warn};

use super::{
    sink::Sink,
    tone::{ToneSynthesizer, BUF_LEN},
};
use crate::error::Result;

/// One tone to play.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneRequest {
    /// Base frequency in Hz.
    pub frequency: f32,
    /// Depth of the dip in Hz at the middle of every buffer.
    pub bend: f32,
    /// Length in seconds.
    pub duration: f32,
}

/// How the samples of a [`ToneRequest`] are spread over sink writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Samples covering the whole duration, fractions dropped.
    pub total: usize,
    /// Writes of a full [`BUF_LEN`] buffer.
    pub full_chunks: usize,
    /// Size of the final partial write, zero for none.
    pub remainder: usize,
}

/// Running totals across every write of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackCounters {
    /// Frames the sink reported as accepted.
    pub frames: u64,
    /// Write calls issued.
    pub writes: u64,
    /// Writes where the sink took fewer frames than offered.
    pub short_writes: u64,
}

impl ToneRequest {
    pub fn new(frequency: f32, bend: f32, duration: f32) -> Self {
        Self {
            frequency,
            bend,
            duration,
        }
    }
}

impl ChunkPlan {
    pub fn new(duration: f32, sample_rate: u32, channels: u16) -> Self {
        // Negative or NaN durations saturate to zero samples
        let total = (sample_rate as f32 * channels as f32 * duration) as usize;
        Self {
            total,
            full_chunks: total / BUF_LEN,
            remainder: total % BUF_LEN,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Frame count of every write in order.
    pub fn writes(&self) -> impl Iterator<Item = usize> {
        std::iter::repeat(BUF_LEN)
            .take(self.full_chunks)
            .chain((self.remainder > 0).then_some(self.remainder))
    }
}

impl PlaybackCounters {
    fn record(&mut self, requested: usize, accepted: usize) {
        self.writes += 1;
        self.frames += accepted as u64;

        if accepted < requested {
            self.short_writes += 1;
            warn!("Sink accepted {accepted} of {requested} frames");
        }
    }
}

/// Plays `tone` on `sink`, re-synthesizing the buffer first.
/// Short writes are counted, never retried.
pub fn play(
    synth: &mut ToneSynthesizer,
    sink: &mut impl Sink,
    counters: &mut PlaybackCounters,
    channels: u16,
    tone: ToneRequest,
) -> Result<()> {
    let plan = ChunkPlan::new(tone.duration, synth.sample_rate(), channels);
    debug!("Playing {tone:?} as {plan:?}");

    if plan.is_empty() {
        return Ok(());
    }

    let buf = synth.synthesize(tone.frequency, tone.bend);
    for frames in plan.writes() {
        let accepted = sink.write(&buf[..frames])?;
        counters.record(frames, accepted);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::{play, ChunkPlan, PlaybackCounters, ToneRequest};
    use crate::audio::{sink::test::RecordingSink, tone::ToneSynthesizer, BUF_LEN};

    fn run(tone: ToneRequest, sink: &mut RecordingSink) -> PlaybackCounters {
        let mut synth = ToneSynthesizer::new(48000);
        let mut counters = PlaybackCounters::default();
        play(&mut synth, sink, &mut counters, 1, tone).unwrap();
        counters
    }

    #[test]
    fn test_one_second() {
        let mut sink = RecordingSink::default();
        let counters = run(ToneRequest::new(440.0, 0.0, 1.0), &mut sink);

        assert_eq!(sink.writes, vec![BUF_LEN]);
        assert_eq!(sink.total(), 48000);
        assert_eq!(counters.frames, 48000);
        assert_eq!(counters.writes, 1);
    }

    #[test]
    fn test_full_chunks_and_remainder() {
        let mut sink = RecordingSink::default();
        run(ToneRequest::new(440.0, 26.0, 2.5), &mut sink);

        assert_eq!(sink.writes, vec![BUF_LEN, BUF_LEN, 24000]);
        assert_eq!(sink.total(), 120000);
    }

    #[test]
    fn test_short_duration() {
        let mut sink = RecordingSink::default();
        run(ToneRequest::new(440.0, 26.0, 0.25), &mut sink);
        assert_eq!(sink.writes, vec![12000]);
    }

    #[test]
    fn test_zero_duration() {
        let mut sink = RecordingSink::default();
        let counters = run(ToneRequest::new(440.0, 26.0, 0.0), &mut sink);

        assert!(sink.writes.is_empty());
        assert_eq!(counters, PlaybackCounters::default());
    }

    #[test]
    fn test_sub_sample_duration() {
        let mut sink = RecordingSink::default();
        run(ToneRequest::new(440.0, 26.0, 1.0 / 96000.0), &mut sink);
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_negative_duration() {
        let mut sink = RecordingSink::default();
        run(ToneRequest::new(440.0, 26.0, -3.0), &mut sink);
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn test_plan_totals() {
        let cases = [
            (0.1, 4800),
            (0.5, 24000),
            (0.7, 33600),
            (1.0, 48000),
            (1.75, 84000),
            (2.3, 110400),
            (3.0, 144000),
            (10.2, 489600),
        ];

        for (duration, total) in cases {
            let plan = ChunkPlan::new(duration, 48000, 1);

            assert_eq!(plan.total, total);
            assert_eq!(plan.full_chunks, total / BUF_LEN);
            assert_eq!(plan.writes().sum::<usize>(), total);
            assert!(plan.writes().filter(|&x| x != BUF_LEN).count() <= 1);
        }
    }

    #[test]
    fn test_fractional_duration_writes() {
        let mut sink = RecordingSink::default();
        run(ToneRequest::new(440.0, 26.0, 10.2), &mut sink);

        assert_eq!(sink.writes.len(), 11);
        assert_eq!(sink.writes.last(), Some(&9600));
        assert_eq!(sink.total(), 489600);

        let mut sink = RecordingSink::default();
        run(ToneRequest::new(440.0, 26.0, 2.3), &mut sink);
        assert_eq!(sink.writes, vec![BUF_LEN, BUF_LEN, 14400]);
    }

    #[test]
    fn test_plan_counts_channels() {
        let plan = ChunkPlan::new(1.0, 48000, 2);
        assert_eq!(plan.total, 96000);
        assert_eq!(plan.full_chunks, 2);
        assert_eq!(plan.remainder, 0);
    }

    #[test]
    fn test_short_writes_tolerated() {
        let mut sink = RecordingSink {
            accept_limit: Some(1000),
            ..Default::default()
        };
        let counters = run(ToneRequest::new(440.0, 26.0, 1.5), &mut sink);

        assert_eq!(sink.writes, vec![BUF_LEN, 24000]);
        assert_eq!(counters.frames, 2000);
        assert_eq!(counters.writes, 2);
        assert_eq!(counters.short_writes, 2);
    }

    #[test]
    fn test_counters_accumulate() {
        let mut synth = ToneSynthesizer::new(48000);
        let mut sink = RecordingSink::default();
        let mut counters = PlaybackCounters::default();

        for _ in 0..3 {
            let tone = ToneRequest::new(440.0, 26.0, 0.5);
            play(&mut synth, &mut sink, &mut counters, 1, tone).unwrap();
        }

        assert_eq!(counters.frames, 72000);
        assert_eq!(counters.writes, 3);
    }
}
