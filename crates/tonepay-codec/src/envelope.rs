//! Reconstructor/projector between the compact wire records and the
//! surrounding settlement ecosystem's external JSON representation.
//!
//! The bit layout here is explicitly not part of this crate's wire
//! contract (see spec §4.2/§6): it is a best-effort mirror of the
//! pay-per-request envelope the settlement collaborator actually speaks,
//! kept only so [`PaymentRequest`]/[`PaymentResponse`] have a concrete
//! external type to project to and reconstruct from.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::{CodecError, Network, PaymentRequest, PaymentResponse, Result, Scheme};

/// Out-of-band context the wire record doesn't carry: a human-readable
/// description and the resource URL the payment is gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMeta {
    /// Human-readable description of what is being purchased.
    pub description: String,
    /// URL of the gated resource.
    pub resource: String,
}

/// One advertised "accept" option, mirroring the settlement ecosystem's
/// `PaymentRequirements` JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequirements {
    /// Scheme name, e.g. "exact".
    pub scheme: String,
    /// Network name, e.g. "base-sepolia".
    pub network: String,
    /// Price as a decimal string, in smallest token units.
    pub max_amount_required: String,
    /// URL of the gated resource.
    pub resource: String,
    /// Human-readable description.
    pub description: String,
    /// 0x-prefixed recipient address.
    pub pay_to: String,
    /// Authorization validity window, seconds.
    pub max_timeout_seconds: u64,
    /// 0x-prefixed stablecoin asset address.
    pub asset: String,
}

/// The full HTTP 402 response body: a protocol version and a list of
/// acceptable payment options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment402Response {
    /// Envelope protocol version.
    pub x402_version: u32,
    /// Offered payment options; the projector selects the first.
    pub accepts: Vec<PaymentRequirements>,
}

impl PaymentRequest {
    /// Reconstruct the external 402 response envelope from this decoded
    /// request plus the out-of-band metadata the wire form omits.
    #[must_use]
    pub fn reconstruct(&self, meta: &ResourceMeta) -> Payment402Response {
        Payment402Response {
            x402_version: 1,
            accepts: vec![PaymentRequirements {
                scheme: self.scheme.to_string(),
                network: network_name(self.network).to_string(),
                max_amount_required: self.price.to_string(),
                resource: meta.resource.clone(),
                description: meta.description.clone(),
                pay_to: format!("0x{}", hex::encode(self.pay_to)),
                max_timeout_seconds: u64::from(self.timeout),
                asset: format!("0x{}", hex::encode(self.network.asset_address())),
            }],
        }
    }
}

impl Payment402Response {
    /// Project the external envelope back to a compact [`PaymentRequest`],
    /// selecting the first advertised accept option.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::NoRequirementsOffered`] if `accepts` is empty,
    /// or [`CodecError::InvalidHex`]/[`CodecError::WrongFieldLength`] if
    /// `pay_to` is not a well-formed 20-byte hex address.
    pub fn project(&self, nonce: u8) -> Result<PaymentRequest> {
        let req = self.accepts.first().ok_or(CodecError::NoRequirementsOffered)?;
        let price: u64 = req.max_amount_required.parse().unwrap_or(u64::MAX);
        let pay_to = parse_address("payTo", &req.pay_to)?;
        let network = network_from_name(&req.network);
        let scheme = if req.scheme == "exact" { Scheme::Exact } else { Scheme::Unknown(0xFF) };
        Ok(PaymentRequest::new(1, network, scheme, price, pay_to, req.max_timeout_seconds.min(u64::from(u32::MAX)) as u32, nonce))
    }
}

/// EIP-712-shaped signature, as carried in the `X-PAYMENT` header payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSignature {
    /// Recovery byte, decimal.
    pub v: u8,
    /// 0x-prefixed 32-byte r component.
    pub r: String,
    /// 0x-prefixed 32-byte s component.
    pub s: String,
}

/// The `transferWithAuthorization` parameters, as carried in the
/// `X-PAYMENT` header payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    /// 0x-prefixed sender address.
    pub from: String,
    /// 0x-prefixed recipient address.
    pub to: String,
    /// Transfer amount, decimal string.
    pub value: String,
    /// Unix timestamp, decimal string.
    pub valid_after: String,
    /// Unix timestamp, decimal string.
    pub valid_before: String,
    /// 0x-prefixed 32-byte nonce.
    pub nonce: String,
}

/// Inner payload of the `X-PAYMENT` header: signature plus authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPayloadInner {
    /// The buyer's signature over the authorization.
    pub signature: PaymentSignature,
    /// The authorization being signed.
    pub authorization: Authorization,
}

/// The full `X-PAYMENT` header payload (base64-encoded JSON on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPayload {
    /// Envelope protocol version.
    pub x402_version: u32,
    /// Scheme name.
    pub scheme: String,
    /// Network name.
    pub network: String,
    /// Signature and authorization payload.
    pub payload: PaymentPayloadInner,
}

impl PaymentResponse {
    /// Reconstruct the external `X-PAYMENT` payload from this decoded
    /// response plus the sender/recipient addresses and transfer value the
    /// wire form doesn't carry (those come from the original request).
    #[must_use]
    pub fn reconstruct(&self, from: [u8; 20], to: [u8; 20], value: u32) -> PaymentPayload {
        PaymentPayload {
            x402_version: 1,
            scheme: self.scheme.to_string(),
            network: network_name(self.network).to_string(),
            payload: PaymentPayloadInner {
                signature: PaymentSignature {
                    v: self.v,
                    r: format!("0x{}", hex::encode(self.r)),
                    s: format!("0x{}", hex::encode(self.s)),
                },
                authorization: Authorization {
                    from: format!("0x{}", hex::encode(from)),
                    to: format!("0x{}", hex::encode(to)),
                    value: value.to_string(),
                    valid_after: self.valid_after.to_string(),
                    valid_before: self.valid_before.to_string(),
                    nonce: format!("0x{}", hex::encode(self.nonce)),
                },
            },
        }
    }

    /// Base64-encode [`Self::reconstruct`]'s JSON, matching the literal
    /// bytes a settlement collaborator would read off the `X-PAYMENT`
    /// header.
    #[must_use]
    pub fn to_x_payment_header(&self, from: [u8; 20], to: [u8; 20], value: u32) -> String {
        let payload = self.reconstruct(from, to, value);
        let json = serde_json::to_vec(&payload).unwrap_or_default();
        base64::engine::general_purpose::STANDARD.encode(json)
    }
}

impl PaymentPayload {
    /// Project this external payload back to a compact [`PaymentResponse`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::WrongFieldLength`]/[`CodecError::InvalidHex`]
    /// if `r`, `s`, or `nonce` are not well-formed 32-byte hex strings.
    pub fn project(&self) -> Result<PaymentResponse> {
        let r = parse_bytes32("r", &self.payload.signature.r)?;
        let s = parse_bytes32("s", &self.payload.signature.s)?;
        let nonce = parse_bytes32("nonce", &self.payload.authorization.nonce)?;
        let network = network_from_name(&self.network);
        let scheme = if self.scheme == "exact" { Scheme::Exact } else { Scheme::Unknown(0xFF) };
        Ok(PaymentResponse {
            version: 1,
            network,
            scheme,
            v: self.payload.signature.v,
            r,
            s,
            nonce,
            valid_after: self.payload.authorization.valid_after.parse().unwrap_or(0),
            valid_before: self.payload.authorization.valid_before.parse().unwrap_or(0),
        })
    }

    /// Decode a base64 `X-PAYMENT` header value and project it.
    pub fn from_x_payment_header(header: &str) -> Result<PaymentResponse> {
        let json = base64::engine::general_purpose::STANDARD
            .decode(header)
            .map_err(|e| CodecError::MalformedEnvelope(e.to_string()))?;
        let payload: Self = serde_json::from_slice(&json)
            .map_err(|e| CodecError::MalformedEnvelope(e.to_string()))?;
        payload.project()
    }
}

fn network_name(network: Network) -> &'static str {
    match network {
        Network::BaseSepolia => "base-sepolia",
        Network::Base => "base",
        Network::Ethereum => "ethereum",
        Network::EthereumSepolia => "ethereum-sepolia",
    }
}

fn network_from_name(name: &str) -> Network {
    match name {
        "base" => Network::Base,
        "ethereum" => Network::Ethereum,
        "ethereum-sepolia" => Network::EthereumSepolia,
        _ => Network::BaseSepolia,
    }
}

fn parse_address(field: &'static str, s: &str) -> Result<[u8; 20]> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|source| CodecError::InvalidHex { field, source })?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CodecError::WrongFieldLength { field, expected: 20, actual: len })
}

fn parse_bytes32(field: &'static str, s: &str) -> Result<[u8; 32]> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(stripped).map_err(|source| CodecError::InvalidHex { field, source })?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| CodecError::WrongFieldLength { field, expected: 32, actual: len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_reconstruct_project_round_trips_wire_fields() {
        let req = PaymentRequest::new(
            1,
            Network::Base,
            Scheme::Exact,
            1000,
            [0x11; 20],
            60,
            3,
        );
        let meta = ResourceMeta { description: "widget".into(), resource: "https://example.com".into() };
        let envelope = req.reconstruct(&meta);
        assert_eq!(envelope.accepts.len(), 1);
        assert_eq!(envelope.accepts[0].max_amount_required, "1000");

        let projected = envelope.project(3).expect("project");
        assert_eq!(projected.network, req.network);
        assert_eq!(projected.price, req.price);
        assert_eq!(projected.pay_to, req.pay_to);
        assert_eq!(projected.timeout, req.timeout);
    }

    #[test]
    fn projector_selects_first_accept() {
        let first = PaymentRequirements {
            scheme: "exact".into(),
            network: "base".into(),
            max_amount_required: "42".into(),
            resource: "https://a".into(),
            description: "a".into(),
            pay_to: format!("0x{}", hex::encode([1u8; 20])),
            max_timeout_seconds: 30,
            asset: format!("0x{}", hex::encode(Network::Base.asset_address())),
        };
        let second = PaymentRequirements { max_amount_required: "999".into(), ..first.clone() };
        let envelope = Payment402Response { x402_version: 1, accepts: vec![first, second] };
        let projected = envelope.project(0).expect("project");
        assert_eq!(projected.price, 42);
    }

    #[test]
    fn empty_accepts_fails() {
        let envelope = Payment402Response { x402_version: 1, accepts: vec![] };
        assert_eq!(envelope.project(0), Err(CodecError::NoRequirementsOffered));
    }

    #[test]
    fn response_reconstruct_project_round_trips_wire_fields() {
        let resp = PaymentResponse {
            version: 1,
            network: Network::BaseSepolia,
            scheme: Scheme::Exact,
            v: 0x1b,
            r: [0xAB; 32],
            s: [0xCD; 32],
            nonce: [0xEF; 32],
            valid_after: 1_700_000_000,
            valid_before: 1_700_000_060,
        };
        let header = resp.to_x_payment_header([0x22; 20], [0x33; 20], 1000);
        let projected = PaymentPayload::from_x_payment_header(&header).expect("project");
        assert_eq!(projected, resp);
    }
}
