//! Where synthesized samples end up.

use crate::error::Result;

/// A blocking audio output.
/// Frames are mono `f32` samples at the rate the sink was opened with.
pub trait Sink {
    /// Queues `frames` for playback, blocking until the device takes them.
    /// Returns how many frames were accepted, which may be fewer than given.
    fn write(&mut self, frames: &[f32]) -> Result<usize>;

    /// Blocks until everything queued has been played.
    fn drain(&mut self) -> Result<()>;

    /// Releases the device.
    fn close(self)
    where
        Self: Sized;
}
