//! Acoustic send/receive façade over a generic [`AudioDevice`] (spec §13.3).
//!
//! Keeps protocol framing (`tonepay_modem`) separate from device I/O, the
//! same separation the teacher draws between `lockframe-proto`'s Sans-IO
//! frames and `lockframe-client`'s QUIC transport.

use std::time::Duration;

use tokio::sync::watch;

use crate::device::AudioDevice;
use crate::error::TransportError;

/// How long a buyer's wallet needs to produce a signed authorization before
/// transmitting a response (spec §12, grounded in `ui_buyer.py`'s fixed
/// processing delay). Not invoked automatically by [`AcousticLink::send`] or
/// [`AcousticLink::receive`]; callers sleep on it explicitly between
/// receiving a request and sending back a signed response.
pub const BUYER_PROCESSING_PAUSE: Duration = Duration::from_secs(8);

/// Pairs a [`tonepay_modem`] codec with a generic [`AudioDevice`], plus a
/// live amplitude channel for a UI meter.
pub struct AcousticLink<D: AudioDevice> {
    device: D,
    amplitude_tx: watch::Sender<f32>,
    amplitude_rx: watch::Receiver<f32>,
}

impl<D: AudioDevice> AcousticLink<D> {
    /// Wrap `device` in a link with its own amplitude channel, initialized
    /// to `0.0`.
    #[must_use]
    pub fn new(device: D) -> Self {
        let (amplitude_tx, amplitude_rx) = watch::channel(0.0);
        Self { device, amplitude_tx, amplitude_rx }
    }

    /// Subscribe to the live input amplitude (peak absolute sample value per
    /// captured chunk), updated only while [`Self::receive`] is capturing.
    /// Grounded in `ui_seller.py`'s amplitude bar shown while listening for a
    /// buyer's response.
    #[must_use]
    pub fn amplitude(&self) -> watch::Receiver<f32> {
        self.amplitude_rx.clone()
    }

    /// Modulate `payload` and play it, blocking until playback drains.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Modem`] if `payload` exceeds the modem's
    /// frame size limit, or [`TransportError::Device`] if playback fails.
    pub fn send(&self, payload: &[u8]) -> Result<(), TransportError<D::Error>> {
        let samples = tonepay_modem::modulate(payload).map_err(TransportError::Modem)?;
        self.device.play(&samples).map_err(TransportError::Device)
    }

    /// Capture up to `max` of audio and attempt to demodulate a frame.
    ///
    /// `Ok(None)` means no frame was recoverable from the capture: the modem
    /// exposes a single opaque failure tag (spec §4.4.4), surfaced here as
    /// `None` so callers can retry without matching on an error variant. The
    /// modem's own error is still logged at `debug`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Device`] if the capture itself fails (no
    /// device, stream error); never for a failed demodulation.
    pub fn receive(&self, max: Duration) -> Result<Option<Vec<u8>>, TransportError<D::Error>> {
        let tx = self.amplitude_tx.clone();
        let mut on_chunk = |chunk: &[f32]| {
            let peak = chunk.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
            let _ = tx.send(peak);
        };
        let audio = self.device.record(max, &mut on_chunk).map_err(TransportError::Device)?;
        match tonepay_modem::demodulate(&audio) {
            Ok(payload) => Ok(Some(payload)),
            Err(error) => {
                tracing::debug!(%error, "capture did not yield a recoverable frame");
                Ok(None)
            }
        }
    }
}
