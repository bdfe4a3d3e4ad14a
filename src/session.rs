//! Playback state for one run of the program.

use crate::{
    audio::{
        chunker::{self, PlaybackCounters, ToneRequest},
        sequence::Player,
        sink::Sink,
        tone::ToneSynthesizer,
    },
    config::AudioConfig,
    error::Result,
};

/// Owns the synthesis buffer, the frame counters and the sink.
/// Every tone of a run goes through the same session.
pub struct Session<S: Sink> {
    synth: ToneSynthesizer,
    sink: S,
    counters: PlaybackCounters,
    channels: u16,
    bend: f32,
}

impl<S: Sink> Session<S> {
    pub fn new(config: &AudioConfig, sink: S, bend: f32) -> Self {
        Self {
            synth: ToneSynthesizer::new(config.sample_rate),
            sink,
            counters: PlaybackCounters::default(),
            channels: config.channels,
            bend,
        }
    }

    pub fn play(&mut self, tone: ToneRequest) -> Result<()> {
        chunker::play(
            &mut self.synth,
            &mut self.sink,
            &mut self.counters,
            self.channels,
            tone,
        )
    }

    pub fn counters(&self) -> PlaybackCounters {
        self.counters
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Waits for queued audio to finish, then releases the sink.
    pub fn finish(mut self) -> Result<PlaybackCounters> {
        self.sink.drain()?;
        self.sink.close();
        Ok(self.counters)
    }
}

impl<S: Sink> Player for Session<S> {
    fn play_tone(&mut self, frequency: f32, duration: f32) -> Result<()> {
        self.play(ToneRequest::new(frequency, self.bend, duration))
    }
}

#[cfg(test)]
mod test {
    use super::Session;
    use crate::{
        audio::{
            sequence::{play_frequency_sequence, play_note_sequence, SequenceSpec, Unit},
            sink::test::RecordingSink,
            BUF_LEN,
        },
        config::AudioConfig,
    };

    fn session() -> Session<RecordingSink> {
        Session::new(&AudioConfig::default(), RecordingSink::default(), 26.0)
    }

    #[test]
    fn test_frequency_sequence_writes() {
        let mut session = session();
        let spec = SequenceSpec::new(0, 3, 1.0, Unit::Frequency);
        play_frequency_sequence(&mut session, 440.0, 1.5, &spec).unwrap();

        assert_eq!(session.sink().writes, [BUF_LEN, 24000].repeat(3));
        assert_eq!(session.counters().frames, 3 * 72000);
    }

    #[test]
    fn test_empty_sequence_touches_nothing() {
        let mut session = session();
        let spec = SequenceSpec::new(5, 0, 1.0, Unit::Note);
        play_note_sequence(&mut session, 48, 1.0, &spec).unwrap();

        assert!(session.sink().writes.is_empty());
    }

    #[test]
    fn test_finish_drains() {
        let sink = RecordingSink::default();
        let drained = sink.drained.clone();
        let mut session = Session::new(&AudioConfig::default(), sink, 26.0);
        let spec = SequenceSpec::new(0, 2, 1.0, Unit::Note);
        play_note_sequence(&mut session, 48, 0.5, &spec).unwrap();

        let counters = session.finish().unwrap();
        assert_eq!(counters.frames, 48000);
        assert_eq!(counters.writes, 2);
        assert_eq!(counters.short_writes, 0);
        assert!(drained.get());
    }
}
