//! Audio decoding and format conversion.
//!
//! `wav` demuxes provider containers into PCM, `resample` adapts that PCM to
//! the rate and layout the frame consumer requires.

pub mod resample;
pub mod wav;

pub use resample::convert;
pub use wav::{PcmBuffer, parse};
