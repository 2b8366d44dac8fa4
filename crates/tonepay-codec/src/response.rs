//! `PaymentResponse`: the 108-byte record a buyer returns.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{CodecError, Network, Result, Scheme};

/// Fixed 108-byte wire layout, big-endian, field order exactly as specified:
/// `version | network | scheme | v | r | s | nonce | valid_after |
/// valid_before`.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
struct RawResponse {
    version: u8,
    network: u8,
    scheme: u8,
    v: u8,
    r: [u8; 32],
    s: [u8; 32],
    nonce: [u8; 32],
    valid_after: [u8; 4],
    valid_before: [u8; 4],
}

impl RawResponse {
    const SIZE: usize = 108;
}

/// A buyer's signed authorization, in compact wire form.
///
/// `r`, `s`, and `nonce` are opaque 32-byte strings carried verbatim; the
/// core never interprets them (see [`crate::PaymentSigner`]).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PaymentResponse {
    /// Protocol version.
    pub version: u8,
    /// Settlement network.
    pub network: Network,
    /// Settlement scheme.
    pub scheme: Scheme,
    /// Signature recovery byte.
    pub v: u8,
    /// Signature component r.
    pub r: [u8; 32],
    /// Signature component s.
    pub s: [u8; 32],
    /// Random authorization nonce (distinct from the request's small counter).
    pub nonce: [u8; 32],
    /// Unix timestamp the authorization becomes valid.
    pub valid_after: u32,
    /// Unix timestamp the authorization expires.
    pub valid_before: u32,
}

// Manual Debug: `r`/`s`/`nonce` are 32-byte opaque blobs, printed as hex so
// failures are legible without dumping 96 raw bytes three times over.
impl std::fmt::Debug for PaymentResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentResponse")
            .field("version", &self.version)
            .field("network", &self.network)
            .field("scheme", &self.scheme)
            .field("v", &self.v)
            .field("r", &hex::encode(self.r))
            .field("s", &hex::encode(self.s))
            .field("nonce", &hex::encode(self.nonce))
            .field("valid_after", &self.valid_after)
            .field("valid_before", &self.valid_before)
            .finish()
    }
}

impl PaymentResponse {
    /// Size of the encoded wire form in bytes.
    pub const SIZE: usize = RawResponse::SIZE;

    /// Serialize to the fixed 108-byte wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let raw = RawResponse {
            version: self.version,
            network: self.network.id(),
            scheme: self.scheme.id(),
            v: self.v,
            r: self.r,
            s: self.s,
            nonce: self.nonce,
            valid_after: self.valid_after.to_be_bytes(),
            valid_before: self.valid_before.to_be_bytes(),
        };
        let bytes = IntoBytes::as_bytes(&raw);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Parse the first 108 bytes of `bytes`, ignoring any trailing bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferTooShort`] if `bytes` is shorter than 108
    /// bytes. Unknown network or scheme IDs never fail.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let raw = RawResponse::ref_from_prefix(bytes)
            .map_err(|_| CodecError::BufferTooShort { expected: Self::SIZE, actual: bytes.len() })?
            .0;

        Ok(Self {
            version: raw.version,
            network: Network::from_id(raw.network),
            scheme: Scheme::from_id(raw.scheme),
            v: raw.v,
            r: raw.r,
            s: raw.s,
            nonce: raw.nonce,
            valid_after: u32::from_be_bytes(raw.valid_after),
            valid_before: u32::from_be_bytes(raw.valid_before),
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample() -> PaymentResponse {
        PaymentResponse {
            version: 1,
            network: Network::BaseSepolia,
            scheme: Scheme::Exact,
            v: 0x1b,
            r: [0xAB; 32],
            s: [0xCD; 32],
            nonce: [0xEF; 32],
            valid_after: 1_700_000_000,
            valid_before: 1_700_000_060,
        }
    }

    #[test]
    fn s2_response_round_trip() {
        let resp = sample();
        let encoded = resp.encode();
        assert_eq!(encoded.len(), 108);
        let decoded = PaymentResponse::decode(&encoded).expect("decode");
        assert_eq!(decoded, resp);
    }

    #[test]
    fn short_buffer_fails() {
        assert!(matches!(
            PaymentResponse::decode(&[0u8; 50]),
            Err(CodecError::BufferTooShort { expected: 108, actual: 50 })
        ));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = sample().encode().to_vec();
        bytes.push(0xAA);
        assert_eq!(PaymentResponse::decode(&bytes).expect("decode"), sample());
    }

    proptest! {
        #[test]
        fn round_trip_any_valid_fields(
            version in any::<u8>(),
            v in any::<u8>(),
            r in proptest::array::uniform32(any::<u8>()),
            s in proptest::array::uniform32(any::<u8>()),
            nonce in proptest::array::uniform32(any::<u8>()),
            valid_after in any::<u32>(),
            valid_before in any::<u32>(),
        ) {
            let resp = PaymentResponse {
                version, network: Network::Ethereum, scheme: Scheme::Exact, v, r, s, nonce,
                valid_after, valid_before,
            };
            let decoded = PaymentResponse::decode(&resp.encode()).expect("decode");
            prop_assert_eq!(decoded, resp);
        }
    }
}
