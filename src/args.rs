use std::time::Duration;

use clap::{value_parser, Arg, ArgAction, ArgGroup, ArgMatches, Command};

use crate::{
    audio::sequence::{SequenceSpec, Unit},
    config::{AudioConfig, DEFAULT_LATENCY, DEFAULT_SAMPLE_RATE},
    error::{Error, Result},
};

pub const DEF_FREQ: f32 = 440.0;
pub const DEF_DUR: f32 = 1.0;
pub const DEF_BEND: f32 = 26.0;

/// What to play.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Frequency(f32),
    FrequencySequence(f32, SequenceSpec),
    Note(i32),
    NoteSequence(i32, SequenceSpec),
    ListDevices,
}

/// A fully resolved command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub duration: f32,
    pub bend: f32,
    pub config: AudioConfig,
    pub verbose: bool,
}

fn command() -> Command {
    let number = |id: &'static str| Arg::new(id).allow_negative_numbers(true);

    Command::new("bendit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Plays sine tones bent down and back up once per second.")
        .args([
            number("duration")
                .short('d')
                .long("duration")
                .help("Duration of every tone in seconds")
                .value_parser(value_parser!(f32))
                .default_value("1"),
            number("frequency")
                .short('f')
                .long("frequency")
                .help("Play a single frequency in Hz")
                .value_parser(value_parser!(f32)),
            number("frequency-sequence")
                .short('F')
                .long("frequency-sequence")
                .help("Play a sequence of frequencies starting at this one")
                .value_parser(value_parser!(f32)),
            number("bend")
                .short('b')
                .long("bend")
                .help("Depth of the pitch bend in Hz")
                .value_parser(value_parser!(f32))
                .default_value("26"),
            number("note")
                .short('n')
                .long("note")
                .help("Play a single note number, 0 being A0")
                .value_parser(value_parser!(i32)),
            number("note-sequence")
                .short('N')
                .long("note-sequence")
                .help("Play a sequence of notes starting at this one")
                .value_parser(value_parser!(i32)),
            number("start")
                .short('s')
                .long("start")
                .help("First loop counter value of a sequence")
                .value_parser(value_parser!(i32))
                .default_value("0"),
            number("stop")
                .short('S')
                .long("stop")
                .help("Loop counter value a sequence stops before")
                .value_parser(value_parser!(i32))
                .default_value("1"),
            number("step")
                .short('t')
                .long("step")
                .help("Amount added to the frequency or note after every tone")
                .value_parser(value_parser!(f32))
                .default_value("1"),
            Arg::new("rate")
                .long("rate")
                .help("Output sample rate")
                .value_parser(value_parser!(u32))
                .default_value("48000"),
            Arg::new("latency-ms")
                .long("latency-ms")
                .help("Audio queued ahead of the device in milliseconds")
                .value_parser(value_parser!(u64))
                .default_value("500"),
            Arg::new("device")
                .long("device")
                .help("Output device, matched by name similarity")
                .default_value("default"),
            Arg::new("list-devices")
                .long("list-devices")
                .help("List the output devices and exit")
                .action(ArgAction::SetTrue),
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug information")
                .action(ArgAction::SetTrue),
            number("freq").help("Frequency to play without any mode flag"),
            number("dur").help("Duration without any mode flag"),
            number("seq-start").help("Sequence start without any mode flag, -1 for none"),
            number("seq-stop").help("Sequence stop without any mode flag"),
            number("seq-step").help("Sequence step without any mode flag"),
        ])
        .group(
            ArgGroup::new("mode")
                .args([
                    "frequency",
                    "frequency-sequence",
                    "note",
                    "note-sequence",
                    "list-devices",
                ])
                .multiple(false),
        )
}

pub fn parse_args() -> Result<Args> {
    Args::from_matches(&command().get_matches())
}

/// Parses a positional number, `None` when it was not given.
fn positional<T: std::str::FromStr>(m: &ArgMatches, id: &str) -> Result<Option<T>> {
    m.get_one::<String>(id)
        .map(|x| {
            x.trim()
                .parse::<T>()
                .map_err(|_| Error::InvalidArgument(format!("invalid {id} `{x}`")))
        })
        .transpose()
}

impl Args {
    pub fn from_matches(m: &ArgMatches) -> Result<Self> {
        let get_f32 = |id: &str| m.get_one::<f32>(id).copied();
        let get_i32 = |id: &str| m.get_one::<i32>(id).copied();

        let config = AudioConfig::new(*m.get_one::<u32>("rate").unwrap_or(&DEFAULT_SAMPLE_RATE))?
            .latency(
                m.get_one::<u64>("latency-ms")
                    .map(|x| Duration::from_millis(*x))
                    .unwrap_or(DEFAULT_LATENCY),
            )
            .device(m.get_one::<String>("device").cloned());

        let mut duration = get_f32("duration").unwrap_or(DEF_DUR);
        let spec = |unit| {
            SequenceSpec::new(
                get_i32("start").unwrap_or(0),
                get_i32("stop").unwrap_or(1),
                get_f32("step").unwrap_or(1.0),
                unit,
            )
        };

        let mode = if m.get_flag("list-devices") {
            Mode::ListDevices
        } else if let Some(freq) = get_f32("frequency") {
            Mode::Frequency(freq)
        } else if let Some(freq) = get_f32("frequency-sequence") {
            Mode::FrequencySequence(freq, spec(Unit::Frequency))
        } else if let Some(note) = get_i32("note") {
            Mode::Note(note)
        } else if let Some(note) = get_i32("note-sequence") {
            Mode::NoteSequence(note, spec(Unit::Note))
        } else {
            let freq = positional::<f32>(m, "freq")?.unwrap_or(DEF_FREQ);
            if freq == 0.0 {
                return Err(Error::InvalidArgument("frequency can't be zero".into()));
            }

            duration = positional::<f32>(m, "dur")?.unwrap_or(duration);
            if duration == 0.0 {
                return Err(Error::InvalidArgument("duration can't be zero".into()));
            }

            match positional::<i32>(m, "seq-start")?.unwrap_or(-1) {
                -1 => Mode::Frequency(freq),
                start => Mode::FrequencySequence(
                    freq,
                    SequenceSpec::new(
                        start,
                        positional::<i32>(m, "seq-stop")?.unwrap_or(0),
                        positional::<f32>(m, "seq-step")?.unwrap_or(1.0),
                        Unit::Frequency,
                    ),
                ),
            }
        };

        if let Mode::FrequencySequence(_, spec) | Mode::NoteSequence(_, spec) = &mode {
            spec.int_step()?;
        }

        Ok(Self {
            mode,
            duration,
            bend: get_f32("bend").unwrap_or(DEF_BEND),
            config,
            verbose: m.get_flag("verbose"),
        })
    }
}
