//! Single-bin Goertzel power estimation (spec §4.4.1 step 2).
//!
//! Computes the energy at exactly one target frequency in O(n) time per
//! window, rejecting noise at other frequencies (e.g. speech) that a simple
//! envelope detector would pick up. Grounded in `original_source
//! /fsk_modem.py`'s `goertzel_power`.

/// Compute the Goertzel power of `window` at `target_hz`, given
/// `sample_rate_hz`.
///
/// Returns `0.0` for an empty window.
#[must_use]
pub fn goertzel_power(window: &[f32], sample_rate_hz: f32, target_hz: f32) -> f32 {
    let n = window.len();
    if n == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let n_f = n as f32;
    let k = (n_f * target_hz / sample_rate_hz).round();
    let omega = 2.0 * std::f32::consts::PI * k / n_f;
    let coeff = 2.0 * omega.cos();

    let mut s1 = 0.0f32;
    let mut s2 = 0.0f32;
    for &x in window {
        let s0 = x + coeff * s1 - s2;
        s2 = s1;
        s1 = s0;
    }

    (s1 * s1 + s2 * s2 - coeff * s1 * s2) / (n_f * n_f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_tone_at_target_has_high_power() {
        const SAMPLE_RATE: f32 = 48_000.0;
        const TARGET: f32 = 2400.0;
        let window: Vec<f32> = (0..480)
            .map(|i| (2.0 * std::f32::consts::PI * TARGET * i as f32 / SAMPLE_RATE).sin() * 0.8)
            .collect();
        let power = goertzel_power(&window, SAMPLE_RATE, TARGET);
        assert!(power > 0.1, "expected strong power at carrier, got {power}");
    }

    #[test]
    fn silence_has_zero_power() {
        let window = vec![0.0f32; 480];
        assert_eq!(goertzel_power(&window, 48_000.0, 2400.0), 0.0);
    }

    #[test]
    fn off_target_tone_has_much_lower_power() {
        const SAMPLE_RATE: f32 = 48_000.0;
        let on_target: Vec<f32> = (0..480)
            .map(|i| (2.0 * std::f32::consts::PI * 2400.0 * i as f32 / SAMPLE_RATE).sin() * 0.8)
            .collect();
        let off_target: Vec<f32> = (0..480)
            .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / SAMPLE_RATE).sin() * 0.8)
            .collect();
        let on_power = goertzel_power(&on_target, SAMPLE_RATE, 2400.0);
        let off_power = goertzel_power(&off_target, SAMPLE_RATE, 2400.0);
        assert!(off_power < on_power / 10.0);
    }

    #[test]
    fn empty_window_is_zero() {
        assert_eq!(goertzel_power(&[], 48_000.0, 2400.0), 0.0);
    }
}
