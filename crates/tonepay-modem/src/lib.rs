//! OOK acoustic modem: physical-layer modulator and demodulator for the
//! payment codec's framed payloads.
//!
//! Turns an arbitrary byte payload (at most 255 bytes, matching
//! [`tonepay_codec::PaymentRequest::SIZE`] and
//! [`tonepay_codec::PaymentResponse::SIZE`]) into a short mono audio buffer
//! using on-off keying of a single tone, and recovers it from a noisy
//! microphone recording via a narrow bandpass filter, Goertzel tone-power
//! estimation, preamble-based symbol synchronization, repetition coding, and
//! a frame-level CRC check.

mod complex;
mod config;
mod constants;
mod demodulate;
mod error;
mod filter;
mod goertzel;
mod modulate;
mod sync;

pub use config::Config;
pub use constants::{
    BANDPASS_HIGH_HZ, BANDPASS_LOW_HZ, BIT_DURATION_SECS, CARRIER_HZ, MAX_PAYLOAD_LEN,
    PREAMBLE, REPETITION, SAMPLES_PER_BIT, SAMPLE_RATE_HZ, SILENCE_SECS, SYNC, TONE_AMPLITUDE,
};
pub use demodulate::{demodulate, demodulate_with_config};
pub use error::ModemError;
pub use goertzel::goertzel_power;
pub use modulate::{duration_for, duration_for_with_config, modulate, modulate_with_config};

/// `Result` alias for modem operations.
pub type Result<T> = std::result::Result<T, ModemError>;
