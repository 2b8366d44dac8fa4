//! Errors surfaced by [`crate::AcousticLink`].

use thiserror::Error;

/// Errors from [`crate::AcousticLink::send`] and [`crate::AcousticLink::receive`].
///
/// Generic over the underlying [`crate::AudioDevice`]'s error type, so a test
/// harness's fake device and [`crate::SystemAudioDevice`]'s `cpal` backend
/// both produce the same enum shape.
#[derive(Debug, Error)]
pub enum TransportError<E: std::error::Error + Send + Sync + 'static> {
    /// The payload could not be modulated (spec §4.3: oversized payload).
    #[error("modem error: {0}")]
    Modem(tonepay_modem::ModemError),

    /// The underlying audio device failed to play or record.
    #[error("audio device error: {0}")]
    Device(E),
}
