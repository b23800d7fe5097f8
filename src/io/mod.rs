//! Audio I/O modules
//!
//! Decoding with Symphonia, decoded sample storage, and canonical WAV output.

pub mod decoder;
pub mod sample_buffer;
pub mod wav;
