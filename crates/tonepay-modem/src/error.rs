//! Modem error types.
//!
//! Decode failure is deliberately a single opaque tag (spec §4.4.4/§7): no
//! sync found, a CRC mismatch, an amplitude too low to carry a tone, and an
//! implausible length byte are all the same outcome from the caller's point
//! of view — retransmit. Sub-classification exists only at `debug`/`trace`
//! log level, never in the return type.

use thiserror::Error;

/// Errors produced by the modulator and demodulator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemError {
    /// The payload handed to [`crate::modulate`] exceeds the one-byte length
    /// field's range.
    #[error("payload of {len} bytes exceeds the {max}-byte modem frame limit")]
    PayloadTooLarge {
        /// Length of the rejected payload.
        len: usize,
        /// Maximum payload length the frame format can carry.
        max: usize,
    },

    /// No payload could be recovered from the captured audio. Subsumes: no
    /// sync found within the search window, too few symbol windows, no
    /// carrier energy detected, an implausible length byte, and a CRC
    /// mismatch.
    #[error("frame not recovered")]
    FrameNotRecovered,
}
