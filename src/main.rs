use std::process;

use anyhow::Result;
use log::LevelFilter;

use args::{Args, Mode};
use audio::{
    chunker::ToneRequest,
    devices::{self, CpalSink},
    sequence,
};
use session::Session;

mod args;
mod audio;
mod config;
mod error;
mod misc;
mod session;

fn main() {
    if let Err(err) = run() {
        eprintln!("[-] Bendit: {err}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = args::parse_args()?;

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if args.mode == Mode::ListDevices {
        for name in devices::list_devices()? {
            println!("{name}");
        }
        return Ok(());
    }

    let sink = CpalSink::open(&args.config)?;
    let mut session = Session::new(&args.config, sink, args.bend);
    play(&mut session, &args)?;

    let counters = session.counters();
    println!("[*] nbFrames played: {}", counters.frames);
    if counters.short_writes > 0 {
        println!(
            "[*] Short writes: {} of {}",
            counters.short_writes, counters.writes
        );
    }

    session.finish()?;
    Ok(())
}

fn play(session: &mut Session<CpalSink>, args: &Args) -> Result<()> {
    let dur = args.duration;
    match &args.mode {
        Mode::Frequency(freq) => {
            println!("[*] Playing Freq, Sine tone at {freq:.3}Hz during {dur:.3} secs.");
            session.play(ToneRequest::new(*freq, args.bend, dur))?;
        }
        Mode::FrequencySequence(freq, spec) => {
            println!("[*] Playing SeqFreq, Sine tone at {freq:.3}Hz, during {dur:.3} secs, {spec}.");
            sequence::play_frequency_sequence(session, *freq, dur, spec)?;
        }
        Mode::Note(note) => {
            println!("[*] Playing Note at {note}, during {dur:.3} secs.");
            sequence::play_note(session, *note, dur)?;
        }
        Mode::NoteSequence(note, spec) => {
            println!("[*] Playing sequence Note at note: {note}, during {dur:.3} secs, {spec}.");
            sequence::play_note_sequence(session, *note, dur, spec)?;
        }
        Mode::ListDevices => {}
    }

    Ok(())
}
