//! Tone sequencer.
//! Steps a loop counter from `start` towards `stop` and plays one tone per step,
//! moving the played frequency (or note) along by `step` each time.

use std::fmt::{self, Display};

use log::debug;

use super::note::note_to_frequency;
use crate::error::{Error, Result};

/// Something that can play a tone of a frequency for a duration.
pub trait Player {
    fn play_tone(&mut self, frequency: f32, duration: f32) -> Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unit {
    Frequency,
    Note,
}

/// Loop bounds of a sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequenceSpec {
    pub start: i32,
    /// Exclusive upper bound.
    pub stop: i32,
    /// Added to the played value after every tone.
    /// The loop counter moves by this truncated to an integer.
    pub step: f32,
    pub unit: Unit,
}

/// Loop counter values of a sequence.
#[derive(Clone, Copy, Debug)]
pub struct Steps {
    i: i64,
    stop: i64,
    step: i64,
}

impl SequenceSpec {
    pub fn new(start: i32, stop: i32, step: f32, unit: Unit) -> Self {
        Self {
            start,
            stop,
            step,
            unit,
        }
    }

    /// Counter step within the `i32` range, rejecting ones that would never reach `stop`.
    pub fn int_step(&self) -> Result<i64> {
        if !self.step.is_finite() {
            return Err(Error::Configuration(format!(
                "sequence step must be finite, got {}",
                self.step
            )));
        }

        match (self.step.trunc() as i64).clamp(i32::MIN as i64, i32::MAX as i64) {
            0 => Err(Error::Configuration(format!(
                "sequence step {} truncates to zero",
                self.step
            ))),
            x => Ok(x),
        }
    }

    /// Loop counter values, empty when `step` points away from `stop`.
    pub fn steps(&self) -> Result<Steps> {
        debug!("Stepping {:?} sequence, {self}", self.unit);
        Ok(Steps {
            i: self.start as i64,
            stop: self.stop as i64,
            step: self.int_step()?,
        })
    }
}

impl Display for SequenceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start: {}, stop: {}, step: {:.3}",
            self.start, self.stop, self.step
        )
    }
}

impl Iterator for Steps {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        // A negative step only moves further below `stop`
        if self.step < 0 || self.i >= self.stop {
            return None;
        }

        let out = self.i;
        self.i = self.i.checked_add(self.step).unwrap_or(i64::MAX);
        Some(out)
    }
}

/// Plays a single note, returning the frequency it was played at.
pub fn play_note(player: &mut impl Player, note: i32, duration: f32) -> Result<f32> {
    let frequency = note_to_frequency(note);
    player.play_tone(frequency, duration)?;
    println!("[I] Freq: {frequency:.3}");
    Ok(frequency)
}

/// Plays `frequency`, then `frequency + step`, and so on once per loop step.
/// The fractional part of the step moves the frequency but not the loop counter.
pub fn play_frequency_sequence(
    player: &mut impl Player,
    mut frequency: f32,
    duration: f32,
    spec: &SequenceSpec,
) -> Result<()> {
    for _ in spec.steps()? {
        player.play_tone(frequency, duration)?;
        frequency += spec.step;
    }

    Ok(())
}

/// Plays `note`, then `note + step`, and so on once per loop step.
pub fn play_note_sequence(
    player: &mut impl Player,
    mut note: i32,
    duration: f32,
    spec: &SequenceSpec,
) -> Result<()> {
    let step = spec.int_step()?;
    for _ in spec.steps()? {
        play_note(player, note, duration)?;
        note = note.saturating_add(step as i32);
    }

    Ok(())
}
