//! The seam between [`crate::AcousticLink`] and an actual audio device.
//!
//! Grounded in the teacher's habit of keeping transport logic generic over a
//! narrow trait with a single production implementation behind it
//! (`lockframe-client/src/transport.rs`'s QUIC I/O sits behind exactly this
//! kind of boundary). [`SystemAudioDevice`] is the production implementation,
//! using `cpal` — the cross-platform audio I/O crate the retrieval pack
//! reaches for in exactly this role (`TING-HiuYu-Remote-Mic`,
//! `ThomasHabets-rustradio`); the teacher's own audio code talks to a running
//! JACK server via the `jack` crate, which assumes professional studio
//! infrastructure this one-shot consumer-hardware modem cannot assume.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;
use thiserror::Error;

/// Errors from [`SystemAudioDevice`]'s `cpal` backend.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No default output device reported by the host.
    #[error("no default output audio device available")]
    NoOutputDevice,

    /// No default input device reported by the host.
    #[error("no default input audio device available")]
    NoInputDevice,

    /// `cpal` stream construction or start failed.
    #[error("audio stream error: {0}")]
    Stream(String),

    /// Playback did not signal completion within a generous timeout,
    /// suggesting the output stream stalled.
    #[error("playback did not complete within the expected window")]
    PlaybackTimedOut,
}

/// Narrow trait separating `tonepay_modem`'s framing from device I/O.
///
/// An `AudioDevice` plays and records mono `f32` PCM at a fixed sample rate.
/// Both methods block the calling thread for the duration of the operation;
/// callers that need concurrency (e.g. a UI thread) should run them on a
/// blocking task.
pub trait AudioDevice {
    /// Error type surfaced by this device.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sample rate, in Hz, this device plays and records at.
    fn sample_rate_hz(&self) -> u32;

    /// Play `samples` (mono, at [`Self::sample_rate_hz`]) and block until
    /// playback has drained.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the device cannot be opened or the stream
    /// fails.
    fn play(&self, samples: &[f32]) -> Result<(), Self::Error>;

    /// Record for up to `duration`, invoking `on_chunk` with each captured
    /// buffer as it arrives, and return the full capture.
    ///
    /// `on_chunk` is the hook [`crate::AcousticLink`] uses to drive its live
    /// amplitude meter; implementations call it from the recording thread,
    /// not from the platform's realtime audio callback, so it is free to do
    /// ordinary (non-realtime-safe) work like sending on a channel.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the device cannot be opened or the stream
    /// fails.
    fn record(
        &self,
        duration: Duration,
        on_chunk: &mut dyn FnMut(&[f32]),
    ) -> Result<Vec<f32>, Self::Error>;
}

/// The system's default input/output device, via `cpal`.
#[derive(Debug, Clone, Copy)]
pub struct SystemAudioDevice {
    sample_rate_hz: u32,
}

impl SystemAudioDevice {
    /// Build a device fixed to `sample_rate_hz`.
    #[must_use]
    pub fn new(sample_rate_hz: u32) -> Self {
        Self { sample_rate_hz }
    }
}

impl Default for SystemAudioDevice {
    fn default() -> Self {
        Self::new(tonepay_modem::SAMPLE_RATE_HZ)
    }
}

impl AudioDevice for SystemAudioDevice {
    type Error = DeviceError;

    fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    fn play(&self, samples: &[f32]) -> Result<(), Self::Error> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(DeviceError::NoOutputDevice)?;
        let config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate_hz),
            buffer_size: cpal::BufferSize::Default,
        };

        let samples = samples.to_vec();
        let total = samples.len();
        let mut cursor = 0usize;
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let mut done_tx = Some(done_tx);

        let stream = device
            .build_output_stream(
                &config,
                move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for sample in out.iter_mut() {
                        *sample = samples.get(cursor).copied().unwrap_or(0.0);
                        cursor += 1;
                    }
                    if cursor >= total {
                        if let Some(tx) = done_tx.take() {
                            let _ = tx.send(());
                        }
                    }
                },
                |err| tracing::warn!(%err, "output stream error"),
                None,
            )
            .map_err(|e| DeviceError::Stream(e.to_string()))?;

        stream.play().map_err(|e| DeviceError::Stream(e.to_string()))?;

        // Generous upper bound: the modem never emits more than a handful of
        // seconds of audio (see tonepay_modem::duration_for), so a stalled
        // stream is distinguishable from a long but legitimate frame.
        done_rx
            .recv_timeout(Duration::from_secs(30))
            .map_err(|_| DeviceError::PlaybackTimedOut)?;
        Ok(())
    }

    fn record(
        &self,
        duration: Duration,
        on_chunk: &mut dyn FnMut(&[f32]),
    ) -> Result<Vec<f32>, Self::Error> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(DeviceError::NoInputDevice)?;
        let config = StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate_hz),
            buffer_size: cpal::BufferSize::Default,
        };

        let (chunk_tx, chunk_rx) = mpsc::channel::<Vec<f32>>();

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let _ = chunk_tx.send(data.to_vec());
                },
                |err| tracing::warn!(%err, "input stream error"),
                None,
            )
            .map_err(|e| DeviceError::Stream(e.to_string()))?;

        stream.play().map_err(|e| DeviceError::Stream(e.to_string()))?;

        let deadline = Instant::now() + duration;
        let mut captured = Vec::new();
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let remaining = deadline.saturating_duration_since(now).min(Duration::from_millis(100));
            match chunk_rx.recv_timeout(remaining) {
                Ok(chunk) => {
                    on_chunk(&chunk);
                    captured.extend(chunk);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
        Ok(captured)
    }
}
