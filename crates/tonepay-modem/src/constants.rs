//! Wire-format constants for the acoustic modem (spec §3/§6).
//!
//! These are the fixed parameters of the on-air frame: process-wide,
//! table-driven values that never change at runtime (spec §9's "Design
//! Notes" on global constants). [`crate::Config`] threads them (and the
//! derived bandpass filter) through call sites that want to exercise
//! non-default parameters in tests; production code uses these directly via
//! [`crate::Config::default`].

/// Audio sample rate, in Hz.
pub const SAMPLE_RATE_HZ: u32 = 48_000;

/// Carrier tone frequency, in Hz.
pub const CARRIER_HZ: f32 = 2400.0;

/// Duration of one symbol, in seconds (100 baud).
pub const BIT_DURATION_SECS: f32 = 0.010;

/// Samples per symbol at [`SAMPLE_RATE_HZ`] and [`BIT_DURATION_SECS`].
pub const SAMPLES_PER_BIT: usize = 480;

/// Repetition factor applied to the length byte, payload, and CRC.
pub const REPETITION: usize = 2;

/// Leading/trailing silence, in seconds.
pub const SILENCE_SECS: f32 = 0.2;

/// Amplitude of a "1" symbol's sine wave.
pub const TONE_AMPLITUDE: f32 = 0.8;

/// 4-byte preamble, transmitted without repetition.
pub const PREAMBLE: [u8; 4] = [0xAA, 0xAA, 0xAA, 0xAA];

/// 1-byte sync marker following the preamble, without repetition.
pub const SYNC: u8 = 0x55;

/// Largest payload the one-byte length field can carry.
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Lower edge of the bandpass filter, in Hz.
pub const BANDPASS_LOW_HZ: f32 = 2000.0;

/// Upper edge of the bandpass filter, in Hz.
pub const BANDPASS_HIGH_HZ: f32 = 2800.0;

/// Order of the Butterworth bandpass filter.
pub const FILTER_ORDER: usize = 4;

/// Sync scan step size, as a divisor of [`SAMPLES_PER_BIT`] (quarter-symbol
/// granularity).
pub const SYNC_STEP_DIVISOR: usize = 4;

/// Upper bound, in seconds, on how much audio the sync scanner searches
/// before giving up.
pub const SYNC_SEARCH_SECS: f32 = 10.0;

/// Minimum number of symbol windows required before the front end will
/// attempt a decode at all.
pub const MIN_WINDOWS: usize = 10;

/// Global Goertzel power floor below which a capture is declared silent.
pub const MIN_MAX_POWER: f32 = 1e-8;

/// Lower percentile used to estimate the "0" power level.
pub const THRESHOLD_LOW_PERCENTILE: f32 = 15.0;

/// Upper percentile used to estimate the "1" power level.
pub const THRESHOLD_HIGH_PERCENTILE: f32 = 85.0;
