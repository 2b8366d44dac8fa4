//! 4th-order Butterworth bandpass filter (spec §4.4.1 step 1), realized as a
//! cascade of biquad sections and applied with zero-phase forward-backward
//! filtering.
//!
//! Grounded in `original_source/fsk_modem.py`'s `signal.butter(4, [low,
//! high], btype='band')` followed by `signal.filtfilt`. `scipy` designs the
//! analog Butterworth prototype, applies the lowpass-to-bandpass frequency
//! transform, then the bilinear transform; this module does the same
//! derivation by hand (see [`crate::complex`]) since no crate in the
//! retrieval pack provides it for a single fixed filter design.

use crate::complex::Complex64;
use crate::constants::{BANDPASS_HIGH_HZ, BANDPASS_LOW_HZ, FILTER_ORDER};

/// One second-order section of the cascade: `H(z) = (b0 + b1 z^-1 + b2 z^-2)
/// / (1 + a1 z^-1 + a2 z^-2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// Process `input`, starting from zero state (direct form II transposed).
    fn process(self, input: &[f32]) -> Vec<f32> {
        let mut z1 = 0.0f64;
        let mut z2 = 0.0f64;
        let mut out = Vec::with_capacity(input.len());
        for &x in input {
            let x = f64::from(x);
            let y = self.b0 * x + z1;
            z1 = self.b1 * x + z2 - self.a1 * y;
            z2 = self.b2 * x - self.a2 * y;
            out.push(y as f32);
        }
        out
    }
}

/// A cascade of biquad sections forming the full bandpass filter.
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    sections: Vec<Biquad>,
}

impl BandpassFilter {
    /// Design the spec's 2000-2800 Hz, 4th-order Butterworth bandpass at
    /// `sample_rate_hz`.
    ///
    /// Computed once (at [`crate::Config`] construction), not per call: pole
    /// placement and the bilinear transform are the expensive part, the
    /// per-sample biquad recurrence is cheap.
    #[must_use]
    pub fn design(sample_rate_hz: u32) -> Self {
        design_butterworth_bandpass(
            f64::from(BANDPASS_LOW_HZ),
            f64::from(BANDPASS_HIGH_HZ),
            f64::from(sample_rate_hz),
            FILTER_ORDER,
        )
    }

    /// Apply the filter with zero-phase forward-backward filtering
    /// (spec §4.4.1: "so group delay does not shift symbol boundaries").
    ///
    /// This is the simplified two-pass `filtfilt`: run the cascade forward,
    /// reverse, run forward again, reverse back. It omits `scipy.signal
    /// .filtfilt`'s edge-padding (`padtype='odd'` by default); the 200ms of
    /// silence bracketing every frame (spec §3) absorbs the startup
    /// transient this would otherwise leave at the buffer edges.
    #[must_use]
    pub fn filtfilt(&self, input: &[f32]) -> Vec<f32> {
        let forward = self.apply_cascade(input);
        let mut reversed = forward;
        reversed.reverse();
        let backward = self.apply_cascade(&reversed);
        let mut result = backward;
        result.reverse();
        result
    }

    fn apply_cascade(&self, input: &[f32]) -> Vec<f32> {
        let mut stage = input.to_vec();
        for section in &self.sections {
            stage = section.process(&stage);
        }
        stage
    }
}

/// Design an order-`order` Butterworth bandpass filter between `low_hz` and
/// `high_hz` at `fs_hz`, returning its biquad-section realization.
fn design_butterworth_bandpass(low_hz: f64, high_hz: f64, fs_hz: f64, order: usize) -> BandpassFilter {
    use std::f64::consts::PI;

    // Pre-warp critical frequencies for the bilinear transform.
    let wl = 2.0 * fs_hz * (PI * low_hz / fs_hz).tan();
    let wh = 2.0 * fs_hz * (PI * high_hz / fs_hz).tan();
    let w0 = (wl * wh).sqrt();
    let bw = wh - wl;

    // Analog Butterworth lowpass prototype poles (normalized cutoff 1 rad/s),
    // left-half-plane roots of s^(2*order) = (-1)^(order+1). These come in
    // `order/2` conjugate pairs (order is assumed even, as it is for this
    // filter's fixed order of 4); only one representative per pair is needed
    // below, since a real-coefficient system's remaining poles are exactly
    // the conjugates of the representative's two bandpass roots.
    assert!(order % 2 == 0, "bandpass design assumes an even filter order");
    let lp_pole_reps: Vec<Complex64> = (1..=order / 2)
        .map(|k| {
            let theta = PI * (2.0 * k as f64 + order as f64 - 1.0) / (2.0 * order as f64);
            Complex64::new(theta.cos(), theta.sin())
        })
        .collect();

    // Lowpass-to-bandpass analog transform: s -> (s^2 + w0^2) / (bw * s).
    // Each representative lowpass pole p yields two bandpass poles solving
    // s^2 - bw*p*s + w0^2 = 0; pairing each with its own complex conjugate
    // (rather than the quadratic's other root) gives the correct
    // real-coefficient biquad factorization (see module-level derivation
    // notes in `DESIGN.md`).
    let two_fs = 2.0 * fs_hz;
    let mut sections = Vec::with_capacity(order);
    for (i, &p) in lp_pole_reps.iter().enumerate() {
        let bw_p = p * bw;
        let discriminant = bw_p * bw_p - Complex64::real(4.0 * w0 * w0);
        let sqrt_disc = discriminant.sqrt();
        let roots = [(bw_p + sqrt_disc) / 2.0, (bw_p - sqrt_disc) / 2.0];

        for pole in roots {
            // Bilinear-transform this analog pole to the unit circle:
            // z = (2*fs + s) / (2*fs - s).
            let z_pole = (Complex64::real(two_fs) + pole) / (Complex64::real(two_fs) - pole);

            // Denominator from the conjugate pole pair: (z - z_pole)(z -
            // conj(z_pole)) = z^2 - 2*Re(z_pole) z + |z_pole|^2.
            let a1 = -2.0 * z_pole.re;
            let a2 = z_pole.re * z_pole.re + z_pole.im * z_pole.im;

            // Numerator: one zero at DC (s=0 -> z=1) and one at Nyquist
            // (s=inf -> z=-1) per section, i.e. (z-1)(z+1) = z^2-1,
            // unnormalized.
            sections.push(Biquad { b0: 1.0, b1: 0.0, b2: -1.0, a1, a2 });
        }
        tracing::trace!(pole_pair = i, "designed bandpass biquad section pair");
    }

    let mut filter = BandpassFilter { sections };
    normalize_center_gain(&mut filter, w0, fs_hz);
    filter
}

/// Scale every section's numerator so the cascade has unity gain at the
/// filter's center frequency (analog `w0`, mapped to a digital angle).
fn normalize_center_gain(filter: &mut BandpassFilter, w0: f64, fs_hz: f64) {
    use std::f64::consts::PI;

    let center_hz = w0 / (2.0 * PI);
    // Evaluate the cascade's magnitude response at the (non-pre-warped)
    // digital center frequency by probing with a one-period sine burst long
    // enough for the IIR sections to settle.
    let period_samples = (fs_hz / center_hz).round().max(4.0) as usize;
    let probe_len = period_samples * 64;
    let probe: Vec<f32> = (0..probe_len)
        .map(|n| (2.0 * PI * center_hz * n as f64 / fs_hz).sin() as f32)
        .collect();
    let response = filter.apply_cascade(&probe);
    let tail = &response[response.len().saturating_sub(period_samples * 4)..];
    let peak = tail.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
    if peak > 1e-12 {
        let scale = 1.0 / f64::from(peak);
        for section in &mut filter.sections {
            section.b0 *= scale;
            section.b1 *= scale;
            section.b2 *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CARRIER_HZ, SAMPLE_RATE_HZ};

    #[test]
    fn passes_carrier_near_unity_gain() {
        let filter = BandpassFilter::design(SAMPLE_RATE_HZ);
        let n = 2000;
        let tone: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * CARRIER_HZ * i as f32 / SAMPLE_RATE_HZ as f32).sin())
            .collect();
        let out = filter.filtfilt(&tone);
        let settled = &out[out.len() / 2..];
        let peak = settled.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
        assert!(peak > 0.5, "expected near-unity passband gain, got {peak}");
    }

    #[test]
    fn attenuates_far_off_band_tone() {
        let filter = BandpassFilter::design(SAMPLE_RATE_HZ);
        let n = 2000;
        let off_band_hz = 500.0f32;
        let tone: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * off_band_hz * i as f32 / SAMPLE_RATE_HZ as f32).sin())
            .collect();
        let out = filter.filtfilt(&tone);
        let settled = &out[out.len() / 2..];
        let peak = settled.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
        assert!(peak < 0.3, "expected strong attenuation of 500Hz, got {peak}");
    }
}
