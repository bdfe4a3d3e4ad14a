//! Audio utilities.
//! Tone synthesis, chunked playback and sequencing.

pub mod chunker;
pub mod devices;
pub mod note;
pub mod sequence;
pub mod sink;
pub mod tone;

pub use tone::BUF_LEN;
