//! OOK demodulator (spec §4.4).
//!
//! Filters the captured audio, estimates per-window Goertzel tone power,
//! finds the preamble/sync transition, then recovers length, payload, and
//! CRC with majority-vote repetition decoding. Grounded in
//! `original_source/fsk_modem.py`'s `decode_fsk`.
//!
//! The only observable failure is [`ModemError::FrameNotRecovered`] (spec
//! §4.4.4): no sub-classification is exposed in the return type, though
//! `tracing` events at `debug` level record which stage gave up, for
//! operators running the CLI with `RUST_LOG=debug`.

use tonepay_codec::crc16_ccitt_false;

use crate::config::Config;
use crate::constants::{CARRIER_HZ, MIN_MAX_POWER, MIN_WINDOWS, THRESHOLD_HIGH_PERCENTILE,
    THRESHOLD_LOW_PERCENTILE};
use crate::error::ModemError;
use crate::goertzel::goertzel_power;
use crate::sync::find_sync;

/// Demodulate `audio` (mono `f32`, assumed captured at 48 kHz) back to the
/// payload bytes [`crate::modulate`] encoded, or fail if no valid frame is
/// recoverable.
///
/// # Errors
///
/// Returns [`ModemError::FrameNotRecovered`] for any of: no carrier energy
/// detected, too few symbol windows, no sync found within the search
/// window, an implausible length byte, or a CRC mismatch.
pub fn demodulate(audio: &[f32]) -> Result<Vec<u8>, ModemError> {
    demodulate_with_config(audio, &Config::default())
}

/// As [`demodulate`], against an explicit [`Config`].
///
/// # Errors
///
/// See [`demodulate`].
pub fn demodulate_with_config(audio: &[f32], config: &Config) -> Result<Vec<u8>, ModemError> {
    let filtered = config.filter.filtfilt(audio);
    let spb = config.samples_per_bit;

    let window_powers = window_goertzel_powers(&filtered, spb, config.sample_rate_hz);
    if window_powers.len() < MIN_WINDOWS {
        tracing::debug!(windows = window_powers.len(), "too few symbol windows");
        return Err(ModemError::FrameNotRecovered);
    }

    let max_power = window_powers.iter().copied().fold(0.0f32, f32::max);
    if max_power < MIN_MAX_POWER {
        tracing::debug!(max_power, "no carrier energy detected");
        return Err(ModemError::FrameNotRecovered);
    }

    let normalized: Vec<f32> = window_powers.iter().map(|p| p / max_power).collect();
    let high = percentile(&normalized, THRESHOLD_HIGH_PERCENTILE);
    let low = percentile(&normalized, THRESHOLD_LOW_PERCENTILE);
    let threshold = (high + low) / 2.0;

    let decode_bit_at = |offset: usize| -> Option<bool> {
        if offset.checked_add(spb)? > filtered.len() {
            return None;
        }
        let power = goertzel_power(&filtered[offset..offset + spb], config.sample_rate_hz as f32, CARRIER_HZ);
        Some(power / max_power > threshold)
    };

    let decode_byte_simple_at = |offset: usize| -> Option<u8> {
        let mut byte = 0u8;
        for i in 0..8 {
            let bit = decode_bit_at(offset + i * spb)?;
            if bit {
                byte |= 1 << (7 - i);
            }
        }
        Some(byte)
    };

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let search_limit_samples = (config.sample_rate_hz as f32 * config.sync_search_secs) as usize;
    let max_search_samples = filtered.len().saturating_sub(spb * 60).min(search_limit_samples);
    let step = (spb / 4).max(1);

    let Some(sync) = find_sync(max_search_samples, step, spb, decode_byte_simple_at) else {
        tracing::debug!("no sync found within search window");
        return Err(ModemError::FrameNotRecovered);
    };

    let mut cursor = sync.sync_start_sample + 8 * spb;

    let Some((length, next)) = decode_byte_with_repetition(cursor, spb, config.repetition, &decode_bit_at)
    else {
        tracing::debug!("length byte truncated by end of capture");
        return Err(ModemError::FrameNotRecovered);
    };
    cursor = next;

    let length = usize::from(length);
    if length > config.max_payload_len {
        tracing::debug!(length, "implausible length byte");
        return Err(ModemError::FrameNotRecovered);
    }

    let mut payload_and_crc = Vec::with_capacity(length + 2);
    for _ in 0..(length + 2) {
        let Some((byte, next)) = decode_byte_with_repetition(cursor, spb, config.repetition, &decode_bit_at)
        else {
            tracing::debug!("payload truncated by end of capture");
            return Err(ModemError::FrameNotRecovered);
        };
        payload_and_crc.push(byte);
        cursor = next;
    }

    let payload = payload_and_crc[..length].to_vec();
    let received_crc = u16::from_be_bytes([payload_and_crc[length], payload_and_crc[length + 1]]);
    let computed_crc = crc16_ccitt_false(&payload);
    if received_crc != computed_crc {
        tracing::debug!(received_crc, computed_crc, "crc mismatch");
        return Err(ModemError::FrameNotRecovered);
    }

    Ok(payload)
}

/// Partition `filtered` into contiguous `samples_per_bit`-sized windows and
/// compute each one's Goertzel power at `carrier_hz`. Trailing samples that
/// don't fill a full window are skipped (spec §4.4.5).
fn window_goertzel_powers(filtered: &[f32], samples_per_bit: usize, sample_rate_hz: u32) -> Vec<f32> {
    filtered
        .chunks(samples_per_bit)
        .filter(|chunk| chunk.len() == samples_per_bit)
        .map(|chunk| goertzel_power(chunk, sample_rate_hz as f32, CARRIER_HZ))
        .collect()
}

/// Decode one bit starting at sample offset `pos`, majority-voting over
/// `repetition` consecutive symbol windows (ties break to 0, spec §4.4.3).
/// Returns the decoded bit and the sample offset just past it.
fn decode_bit_with_repetition(
    pos: usize,
    samples_per_bit: usize,
    repetition: usize,
    decode_bit_at: &impl Fn(usize) -> Option<bool>,
) -> Option<(bool, usize)> {
    let mut ones = 0usize;
    let mut cursor = pos;
    for _ in 0..repetition {
        if decode_bit_at(cursor)? {
            ones += 1;
        }
        cursor += samples_per_bit;
    }
    Some((ones * 2 > repetition, cursor))
}

/// Decode one byte (MSB-first) starting at sample offset `pos`, with each
/// bit majority-voted over `repetition` symbol windows.
fn decode_byte_with_repetition(
    pos: usize,
    samples_per_bit: usize,
    repetition: usize,
    decode_bit_at: &impl Fn(usize) -> Option<bool>,
) -> Option<(u8, usize)> {
    let mut byte = 0u8;
    let mut cursor = pos;
    for i in 0..8 {
        let (bit, next) = decode_bit_with_repetition(cursor, samples_per_bit, repetition, decode_bit_at)?;
        if bit {
            byte |= 1 << (7 - i);
        }
        cursor = next;
    }
    Some((byte, cursor))
}

/// Linear-interpolation percentile, matching the reference implementation's
/// `numpy.percentile` default (spec §4.4.1 step 4). `p` is in `[0, 100]`.
fn percentile(data: &[f32], p: f32) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f32::total_cmp);
    if sorted.len() == 1 {
        return sorted[0];
    }
    #[allow(clippy::cast_precision_loss)]
    let rank = p / 100.0 * (sorted.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - rank.floor();
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
