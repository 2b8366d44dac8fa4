//! Binary wire codec for acoustic micropayment frames.
//!
//! Packs the two records that travel over the acoustic modem: a
//! [`PaymentRequest`] advertised by a seller (30 bytes) and a
//! [`PaymentResponse`] returned by a buyer (108 bytes). Both are fixed-size,
//! big-endian, and zero-copy parseable so they can be handed directly to
//! [`tonepay_modem`] without an intermediate allocation.

mod bits;
mod collaborators;
mod crc;
mod envelope;
mod error;
mod network;
mod request;
mod response;
mod scheme;

pub use bits::{bits_to_bytes, bytes_to_bits};
pub use collaborators::{PaymentSigner, SettlementClient, SettlementRequest, SettlementResult};
pub use crc::crc16_ccitt_false;
pub use envelope::{
    Authorization, Payment402Response, PaymentPayload, PaymentPayloadInner, PaymentRequirements,
    PaymentSignature, ResourceMeta,
};
pub use error::CodecError;
pub use network::Network;
pub use request::PaymentRequest;
pub use response::PaymentResponse;
pub use scheme::Scheme;

/// `Result` alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
