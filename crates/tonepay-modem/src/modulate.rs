//! OOK modulator (spec §4.3).
//!
//! Turns an arbitrary byte payload into a mono float audio buffer: preamble,
//! sync, length byte, payload, CRC, each repetition-coded or not per the
//! wire format, bracketed by silence. Grounded in `original_source
//! /fsk_modem.py`'s `encode_fsk`.

use std::time::Duration;

use tonepay_codec::{bytes_to_bits, crc16_ccitt_false};

use crate::config::Config;
use crate::constants::{PREAMBLE, SYNC};
use crate::error::ModemError;

/// Modulate `payload` into a mono `f32` audio buffer at the spec's default
/// sample rate (48 kHz).
///
/// # Errors
///
/// Returns [`ModemError::PayloadTooLarge`] if `payload.len()` exceeds 255
/// bytes.
pub fn modulate(payload: &[u8]) -> Result<Vec<f32>, ModemError> {
    modulate_with_config(payload, &Config::default())
}

/// As [`modulate`], against an explicit [`Config`] (for tests exercising
/// non-default sample rates or repetition factors).
///
/// # Errors
///
/// Returns [`ModemError::PayloadTooLarge`] if `payload.len()` exceeds
/// `config.max_payload_len`.
pub fn modulate_with_config(payload: &[u8], config: &Config) -> Result<Vec<f32>, ModemError> {
    if payload.len() > config.max_payload_len {
        return Err(ModemError::PayloadTooLarge { len: payload.len(), max: config.max_payload_len });
    }

    #[allow(clippy::cast_possible_truncation)]
    let length_byte = payload.len() as u8;
    let crc = crc16_ccitt_false(payload);
    let trailer = crc.to_be_bytes();

    let mut header_bytes = PREAMBLE.to_vec();
    header_bytes.push(SYNC);
    let header_bits = bytes_to_bits(&header_bytes);

    let length_bits = bytes_to_bits(&[length_byte]);

    let mut payload_and_trailer = payload.to_vec();
    payload_and_trailer.extend_from_slice(&trailer);
    let payload_bits = bytes_to_bits(&payload_and_trailer);

    let silence_samples = config.silence_samples();
    let mut samples = Vec::with_capacity(
        silence_samples * 2
            + (header_bits.len() + (length_bits.len() + payload_bits.len()) * config.repetition)
                * config.samples_per_bit,
    );

    samples.extend(silence(silence_samples));

    for bit in header_bits {
        samples.extend(symbol(bit, config));
    }

    for bit in length_bits {
        for _ in 0..config.repetition {
            samples.extend(symbol(bit, config));
        }
    }

    for bit in payload_bits {
        for _ in 0..config.repetition {
            samples.extend(symbol(bit, config));
        }
    }

    samples.extend(silence(silence_samples));

    Ok(samples)
}

/// One symbol: a full-amplitude sine wave at the carrier for a `1` bit,
/// silence for a `0` bit. Phase resets at the start of every symbol (spec
/// §4.3: "implementers may choose continuous phase but the wire is tolerant
/// of either").
fn symbol(bit: bool, config: &Config) -> Vec<f32> {
    if bit {
        tone(config.samples_per_bit, config.carrier_hz, config.sample_rate_hz, config.tone_amplitude)
    } else {
        silence(config.samples_per_bit)
    }
}

fn tone(num_samples: usize, freq_hz: f32, sample_rate_hz: u32, amplitude: f32) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f32 / sample_rate_hz as f32;
            (2.0 * std::f32::consts::PI * freq_hz * t).sin() * amplitude
        })
        .collect()
}

fn silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Length, in seconds, of the audio [`modulate`] would produce for an
/// `n`-byte payload. Lets the receive side size its recording window
/// (spec §4.3: `duration_for`).
///
/// `duration_for(N) == (40 + (N+3)*16) * 0.010 + 0.4` seconds at the default
/// configuration (5 header bytes * 8 bits, plus `(1+N+2)` repeated bytes * 8
/// bits * repetition 2, times the bit duration, plus 0.4s of silence).
#[must_use]
pub fn duration_for(n: usize) -> Duration {
    duration_for_with_config(n, &Config::default())
}

/// As [`duration_for`], against an explicit [`Config`].
#[must_use]
pub fn duration_for_with_config(n: usize, config: &Config) -> Duration {
    let header_bits = 5 * 8;
    let repeated_bits = (1 + n + 2) * 8 * config.repetition;
    let total_bits = header_bits + repeated_bits;
    #[allow(clippy::cast_precision_loss)]
    let bits_secs = total_bits as f32 * config.bit_duration_secs;
    let total_secs = bits_secs + 2.0 * config.silence_secs;
    Duration::from_secs_f32(total_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_oversized_payload() {
        let payload = vec![0u8; 256];
        assert_eq!(
            modulate(&payload),
            Err(ModemError::PayloadTooLarge { len: 256, max: 255 })
        );
    }

    #[test]
    fn accepts_max_size_payload() {
        let payload = vec![0u8; 255];
        assert!(modulate(&payload).is_ok());
    }

    #[test]
    fn duration_matches_closed_form() {
        // duration_for(N) == (40 + (N+3)*16) * 0.010 + 0.4
        for n in [1usize, 10, 30, 108, 255] {
            let expected = (40.0 + (n as f32 + 3.0) * 16.0) * 0.010 + 0.4;
            let got = duration_for(n).as_secs_f32();
            assert!((got - expected).abs() < 1e-4, "n={n} expected={expected} got={got}");
        }
    }

    #[test]
    fn output_length_matches_bit_count() {
        let payload = b"hello";
        let audio = modulate(payload).expect("modulate");
        let config = Config::default();
        let expected_secs = duration_for(payload.len()).as_secs_f32();
        let expected_samples =
            (expected_secs * config.sample_rate_hz as f32).round() as usize;
        assert!(
            audio.len().abs_diff(expected_samples) <= 1,
            "audio len {} vs expected {}",
            audio.len(),
            expected_samples
        );
    }
}
