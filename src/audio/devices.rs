//! Output device lookup and a [`Sink`] backed by a cpal output stream.
//! Samples are handed to the stream callback through a bounded channel,
//! so writes block once about one latency window of audio is queued.

use std::{sync::Arc, thread, time::Duration};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Device, SampleFormat, SampleRate, Stream, StreamConfig,
};
use crossbeam::channel::{self, Receiver, Sender};
use log::{debug, info};
use parking_lot::Mutex;

use super::sink::Sink;
use crate::{
    config::AudioConfig,
    error::{Error, Result},
    misc::Similarity,
};

/// Frames per message sent to the stream callback.
const CHUNK: usize = 512;
/// How often [`CpalSink::drain`] checks the queue.
const DRAIN_POLL: Duration = Duration::from_millis(10);

pub struct CpalSink {
    stream: Stream,
    tx: Sender<Vec<f32>>,
    latency: Duration,
    error: Arc<Mutex<Option<String>>>,
}

/// Callback side of the channel.
struct Feed {
    rx: Receiver<Vec<f32>>,
    current: Vec<f32>,
    pos: usize,
}

/// Names of every output device on the default host.
pub fn list_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host.output_devices().map_err(device_error)?;
    Ok(devices.filter_map(|x| x.name().ok()).collect())
}

/// Picks the output device whose name is most similar to `wanted`,
/// or the host default when no name is given.
pub fn get_device(wanted: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();
    let wanted = match wanted {
        None | Some("default") => {
            return host
                .default_output_device()
                .ok_or_else(|| Error::Device("no default output device".into()))
        }
        Some(x) => x.to_lowercase(),
    };

    host.output_devices()
        .map_err(device_error)?
        .filter_map(|x| Some((x.name().ok()?.to_lowercase().similarity(&wanted), x)))
        .reduce(|a, b| if a.0 >= b.0 { a } else { b })
        .map(|x| x.1)
        .ok_or_else(|| Error::Device(format!("no output device matching `{wanted}`")))
}

/// Finds a 32-bit float config running at `sample_rate`, preferring fewer channels.
fn get_config(device: &Device, sample_rate: u32) -> Result<StreamConfig> {
    let rate = SampleRate(sample_rate);
    device
        .supported_output_configs()
        .map_err(device_error)?
        .filter(|x| x.sample_format() == SampleFormat::F32)
        .filter(|x| x.min_sample_rate() <= rate && rate <= x.max_sample_rate())
        .min_by_key(|x| x.channels())
        .map(|x| x.with_sample_rate(rate).config())
        .ok_or_else(|| {
            Error::Device(format!(
                "device does not support 32-bit float output at {sample_rate}Hz"
            ))
        })
}

fn device_error(err: impl ToString) -> Error {
    Error::Device(err.to_string())
}

impl CpalSink {
    pub fn open(config: &AudioConfig) -> Result<Self> {
        let device = get_device(config.device.as_deref())?;
        let stream_config = get_config(&device, config.sample_rate)?;
        let channels = stream_config.channels as usize;

        println!(
            "[*] Output hooked into `{}` ({})",
            device.name().map_err(device_error)?,
            stream_config.sample_rate.0
        );
        debug!("Stream config: {stream_config:?}");

        let capacity = (config.latency_frames() / CHUNK).max(1);
        let (tx, rx) = channel::bounded(capacity);
        let mut feed = Feed {
            rx,
            current: Vec::new(),
            pos: 0,
        };

        let error = Arc::new(Mutex::new(None));
        let stream_error = error.clone();
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(channels) {
                        frame.fill(feed.next().unwrap_or(0.0));
                    }
                },
                move |err| {
                    eprintln!("[-] Error: {err}");
                    *stream_error.lock() = Some(err.to_string());
                },
                None,
            )
            .map_err(device_error)?;
        stream.play().map_err(device_error)?;
        info!("Queueing up to {} frames", capacity * CHUNK);

        Ok(Self {
            stream,
            tx,
            latency: config.latency,
            error,
        })
    }

    fn check_error(&self) -> Result<()> {
        match self.error.lock().take() {
            Some(err) => Err(Error::Device(err)),
            None => Ok(()),
        }
    }
}

impl Sink for CpalSink {
    fn write(&mut self, frames: &[f32]) -> Result<usize> {
        self.check_error()?;

        let timeout = self.latency + Duration::from_secs(1);
        let mut accepted = 0;
        for chunk in frames.chunks(CHUNK) {
            match self.tx.send_timeout(chunk.to_vec(), timeout) {
                Ok(()) => accepted += chunk.len(),
                Err(err) => {
                    debug!("Stopped writing after {accepted} frames: {err}");
                    break;
                }
            }
        }

        Ok(accepted)
    }

    fn drain(&mut self) -> Result<()> {
        while !self.tx.is_empty() {
            self.check_error()?;
            thread::sleep(DRAIN_POLL);
        }

        // Whatever the device already buffered
        thread::sleep(self.latency);
        self.check_error()
    }

    fn close(self) {
        if let Err(err) = self.stream.pause() {
            debug!("Failed to pause stream: {err}");
        }
    }
}

impl Iterator for Feed {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.current.len() {
            self.current = self.rx.try_recv().ok()?;
            self.pos = 0;
        }

        let out = self.current.get(self.pos).copied();
        self.pos += 1;
        out
    }
}
