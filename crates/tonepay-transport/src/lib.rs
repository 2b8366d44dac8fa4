//! Acoustic link façade: wraps `tonepay_modem`'s modulator and demodulator
//! around a real or fake audio device (spec §13.3).
//!
//! [`AcousticLink`] is the crate's only public entry point for actually
//! moving bytes over air; [`AudioDevice`] is the seam a test harness plugs a
//! fake into, and [`SystemAudioDevice`] is the `cpal`-backed production
//! implementation.

mod device;
mod error;
mod link;

pub use device::{AudioDevice, DeviceError, SystemAudioDevice};
pub use error::TransportError;
pub use link::{AcousticLink, BUYER_PROCESSING_PAUSE};
