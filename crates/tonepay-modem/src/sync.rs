//! Preamble/sync symbol synchronization (spec §4.4.2).
//!
//! The recording starts at an arbitrary offset relative to the sender's
//! first symbol, so the demodulator slides a quarter-symbol window across
//! the filtered audio looking for the `0xAA 0x55` preamble/sync transition.
//! Grounded in `original_source/fsk_modem.py`'s sync-search loop, including
//! its depth-two tolerance for extra preamble bytes (spec §9 open question,
//! resolved: match the bounded behavior exactly).

use crate::constants::SYNC;

/// Result of a successful sync search: the sample offset of the start of the
/// sync byte (`0x55`), i.e. immediately after the preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncMatch {
    /// Sample offset of the sync byte's first symbol.
    pub sync_start_sample: usize,
}

/// Slide a `step_samples`-wide window (quarter-symbol granularity, spec
/// §4.4.2) across up to `max_search_samples` samples, decoding a candidate
/// byte at each offset via `decode_byte_at` (8 consecutive symbols, no
/// repetition, each `samples_per_bit` samples apart starting at the given
/// offset).
///
/// Tolerates up to two intervening `0xAA` bytes between the first `0xAA` and
/// the `0x55` sync byte (i.e. the scanner accepts alignment to any of the
/// four preamble bytes).
#[must_use]
pub fn find_sync(
    max_search_samples: usize,
    step_samples: usize,
    samples_per_bit: usize,
    decode_byte_at: impl Fn(usize) -> Option<u8>,
) -> Option<SyncMatch> {
    let byte_span = 8 * samples_per_bit;
    let step = step_samples.max(1);
    let mut pos = 0usize;
    while pos < max_search_samples {
        if decode_byte_at(pos) == Some(0xAA) {
            let after1 = pos + byte_span;
            match decode_byte_at(after1) {
                Some(SYNC) => return Some(SyncMatch { sync_start_sample: after1 }),
                Some(0xAA) => {
                    let after2 = after1 + byte_span;
                    match decode_byte_at(after2) {
                        Some(SYNC) => return Some(SyncMatch { sync_start_sample: after2 }),
                        Some(0xAA) => {
                            let after3 = after2 + byte_span;
                            if decode_byte_at(after3) == Some(SYNC) {
                                return Some(SyncMatch { sync_start_sample: after3 });
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        pos += step;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonepay_codec::bytes_to_bits;

    /// Build a `decode_byte_at` closure over a plain bit array at
    /// full-symbol spacing (`samples_per_bit == 1`), for exercising the
    /// search logic without real audio.
    fn byte_decoder(bits: Vec<bool>) -> impl Fn(usize) -> Option<u8> {
        move |start: usize| {
            if start + 8 > bits.len() {
                return None;
            }
            let mut byte = 0u8;
            for i in 0..8 {
                if bits[start + i] {
                    byte |= 1 << (7 - i);
                }
            }
            Some(byte)
        }
    }

    #[test]
    fn finds_sync_immediately_after_single_preamble_byte() {
        let bits = bytes_to_bits(&[0xAA, 0x55, 0x00]);
        let decode = byte_decoder(bits.clone());
        let m = find_sync(bits.len(), 1, 1, decode).expect("sync found");
        assert_eq!(m.sync_start_sample, 8);
    }

    #[test]
    fn tolerates_two_intervening_preamble_bytes() {
        let bits = bytes_to_bits(&[0xAA, 0xAA, 0xAA, 0x55, 0x00]);
        let decode = byte_decoder(bits.clone());
        let m = find_sync(bits.len(), 1, 1, decode).expect("sync found");
        assert_eq!(m.sync_start_sample, 24);
    }

    #[test]
    fn no_sync_in_noise_fails() {
        let bits = bytes_to_bits(&[0x12, 0x34, 0x56, 0x78]);
        let decode = byte_decoder(bits.clone());
        assert!(find_sync(bits.len(), 1, 1, decode).is_none());
    }

    #[test]
    fn finds_sync_offset_into_stream() {
        let mut bytes = vec![0x00, 0x01];
        bytes.extend_from_slice(&[0xAA, 0xAA, 0xAA, 0xAA, 0x55, 0xFF]);
        let bits = bytes_to_bits(&bytes);
        let decode = byte_decoder(bits.clone());
        let m = find_sync(bits.len(), 1, 1, decode).expect("sync found");
        assert_eq!(m.sync_start_sample, 16 + 32);
    }

    #[test]
    fn three_intervening_preamble_bytes_not_tolerated() {
        // A run of 0xAA bytes longer than the depth-two tolerance allows,
        // separated from the sync byte by a byte that is neither 0xAA nor
        // 0x55. Every 0xAA in the run is a candidate anchor, but none of
        // them lands within two intervening 0xAA bytes of the 0x55 — the
        // 0x00 breaks any rescan from a later anchor in the run.
        let bits = bytes_to_bits(&[0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0x00, 0x55]);
        let decode = byte_decoder(bits.clone());
        assert!(find_sync(bits.len(), 1, 1, decode).is_none());
    }
}
