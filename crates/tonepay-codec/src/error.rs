//! Codec error types.
//!
//! Only encode-side validity failures live here. Wire decoding of
//! [`crate::PaymentRequest`]/[`crate::PaymentResponse`] never fails except on
//! a short buffer; unknown scheme and network IDs decode to sentinel values
//! instead of erroring (see `crate::request`/`crate::network`).

use thiserror::Error;

/// Errors produced while encoding a record or translating the external
/// textual payment representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Buffer passed to `decode` is shorter than the fixed record size.
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Required size in bytes.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// A byte field in the external representation had the wrong length.
    #[error("field {field} must be {expected} bytes, got {actual}")]
    WrongFieldLength {
        /// Name of the offending field.
        field: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A hex string in the external representation could not be decoded.
    #[error("field {field} is not valid hex: {source}")]
    InvalidHex {
        /// Name of the offending field.
        field: &'static str,
        /// Underlying decode error.
        #[source]
        source: hex::FromHexError,
    },

    /// The external `accepts` list was empty; the projector has nothing to
    /// select.
    #[error("no payment requirements offered")]
    NoRequirementsOffered,

    /// The `X-PAYMENT` header was not valid base64 or not valid JSON once
    /// decoded.
    #[error("malformed x-payment header: {0}")]
    MalformedEnvelope(String),
}
