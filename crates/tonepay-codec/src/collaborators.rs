//! Seams for the collaborators this crate treats as external (spec §6): the
//! buyer-side typed-data signer and the on-chain settlement endpoint.
//!
//! Neither is implemented here. These traits exist so the rest of the
//! codebase (and any integration built on top of it) has a concrete type to
//! program against instead of an untyped function pointer.

use crate::{Network, PaymentRequest};

/// Produces a buyer's signed authorization over a seller's [`PaymentRequest`].
///
/// Grounded in the typed-data signature the original prototype's
/// `eth_account`-based signer produces before compact-encoding it into a
/// [`crate::PaymentResponse`]. The core never inspects `from_private_key`
/// material or performs the signature itself; this trait is the seam a real
/// wallet integration plugs into.
pub trait PaymentSigner {
    /// Opaque error type surfaced by a concrete signer implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sign `request`, authorizing a transfer of `request.price` from this
    /// signer's account to `request.pay_to` within `request`'s validity
    /// window.
    ///
    /// # Errors
    ///
    /// Implementations return `Self::Error` for anything that prevents
    /// producing a valid signature (unreachable signer, malformed request).
    fn sign(&self, request: &PaymentRequest) -> Result<crate::PaymentResponse, Self::Error>;
}

/// Parameters needed to submit a `transferWithAuthorization` call, combining
/// a decoded [`crate::PaymentResponse`] with the original request and the
/// known sender address (spec §6).
///
/// Grounded in `facilitator.py`'s `SettlementRequest` pydantic model; field
/// names and shape mirror it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementRequest {
    /// Settlement network the authorization targets.
    pub network: Network,
    /// Sender (buyer) account address.
    pub from: [u8; 20],
    /// Recipient (seller) account address.
    pub to: [u8; 20],
    /// Transfer amount, smallest token units.
    pub value: u32,
    /// Unix timestamp the authorization becomes valid.
    pub valid_after: u32,
    /// Unix timestamp the authorization expires.
    pub valid_before: u32,
    /// Random authorization nonce.
    pub nonce: [u8; 32],
    /// Signature recovery byte.
    pub v: u8,
    /// Signature component r.
    pub r: [u8; 32],
    /// Signature component s.
    pub s: [u8; 32],
}

/// The outcome of submitting a [`SettlementRequest`] on-chain.
///
/// Grounded in `facilitator.py`'s `/settle` response body (`tx_hash`, an
/// explorer URL built from it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementResult {
    /// Transaction identifier returned by the chain.
    pub tx_hash: String,
}

/// Submits a signed authorization to the settlement contract.
///
/// Grounded in `facilitator.py`'s `settle_payment`, which calls
/// `transferWithAuthorization` on the stablecoin contract and waits for a
/// receipt. The core only assembles [`SettlementRequest`]; it never talks to
/// a chain itself.
pub trait SettlementClient {
    /// Opaque error type surfaced by a concrete settlement implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submit `request` for on-chain settlement, blocking until a receipt (or
    /// failure) is known.
    ///
    /// # Errors
    ///
    /// Implementations return `Self::Error` for RPC failures, reverted
    /// transactions, or a receipt that never confirms.
    fn settle(&self, request: &SettlementRequest) -> Result<SettlementResult, Self::Error>;
}
