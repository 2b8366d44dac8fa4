//! Modem configuration.
//!
//! The wire format's parameters are fixed constants (spec §3/§6, and see
//! [`crate::constants`]), but per the ambient-stack design note in
//! `SPEC_FULL.md` §11, they are threaded through a `Config` value at the
//! transport/CLI boundary so tests can exercise non-default parameters
//! without touching the `pub const`s production code relies on. The
//! bandpass filter coefficients are derived once here, at construction, not
//! recomputed per [`crate::demodulate`] call.

use crate::constants::{
    BIT_DURATION_SECS, CARRIER_HZ, MAX_PAYLOAD_LEN, REPETITION, SAMPLES_PER_BIT, SAMPLE_RATE_HZ,
    SILENCE_SECS, SYNC_SEARCH_SECS, TONE_AMPLITUDE,
};
use crate::filter::BandpassFilter;

/// Modem parameters, with the bandpass filter design cached alongside them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Audio sample rate, in Hz.
    pub sample_rate_hz: u32,
    /// Carrier tone frequency, in Hz.
    pub carrier_hz: f32,
    /// Duration of one symbol, in seconds.
    pub bit_duration_secs: f32,
    /// Samples per symbol, derived from `sample_rate_hz` and
    /// `bit_duration_secs`.
    pub samples_per_bit: usize,
    /// Repetition factor applied to the length byte, payload, and CRC.
    pub repetition: usize,
    /// Leading/trailing silence, in seconds.
    pub silence_secs: f32,
    /// Amplitude of a "1" symbol's sine wave.
    pub tone_amplitude: f32,
    /// Largest payload the one-byte length field can carry.
    pub max_payload_len: usize,
    /// Upper bound, in seconds, on the sync scanner's search window.
    pub sync_search_secs: f32,
    /// Bandpass filter, designed once for this configuration's sample rate
    /// and the fixed 2000-2800 Hz passband.
    pub(crate) filter: BandpassFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            carrier_hz: CARRIER_HZ,
            bit_duration_secs: BIT_DURATION_SECS,
            samples_per_bit: SAMPLES_PER_BIT,
            repetition: REPETITION,
            silence_secs: SILENCE_SECS,
            tone_amplitude: TONE_AMPLITUDE,
            max_payload_len: MAX_PAYLOAD_LEN,
            sync_search_secs: SYNC_SEARCH_SECS,
            filter: BandpassFilter::design(SAMPLE_RATE_HZ),
        }
    }
}

impl Config {
    /// Build a configuration at a non-default sample rate, re-deriving the
    /// bandpass filter for it. The bandpass edges stay the spec's fixed
    /// 2000-2800 Hz (they are a property of the carrier, not the sample
    /// rate); only the digital filter coefficients change.
    #[must_use]
    pub fn with_sample_rate(sample_rate_hz: u32) -> Self {
        let samples_per_bit = {
            #[allow(clippy::cast_possible_truncation)]
            let n = (f64::from(sample_rate_hz) * f64::from(BIT_DURATION_SECS)).round() as usize;
            n
        };
        Self {
            sample_rate_hz,
            samples_per_bit,
            filter: BandpassFilter::design(sample_rate_hz),
            ..Self::default()
        }
    }

    /// Samples of leading/trailing silence at this configuration's sample
    /// rate.
    #[must_use]
    pub fn silence_samples(&self) -> usize {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (f64::from(self.sample_rate_hz) * f64::from(self.silence_secs)).round() as usize;
        n
    }

}
