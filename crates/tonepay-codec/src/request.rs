//! `PaymentRequest`: the 30-byte record a seller advertises.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{CodecError, Network, Result, Scheme};

/// Fixed 30-byte wire layout, big-endian, field order exactly as specified:
/// `version | network | scheme | price | pay_to | timeout | nonce`.
#[repr(C, packed)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
struct RawRequest {
    version: u8,
    network: u8,
    scheme: u8,
    price: [u8; 4],
    pay_to: [u8; 20],
    timeout: [u8; 2],
    nonce: u8,
}

impl RawRequest {
    const SIZE: usize = 30;
}

/// A seller's advertised payment requirements, in compact wire form.
///
/// Construct with [`PaymentRequest::new`], which silently saturates `price`
/// and `timeout` to their field maxima (the wire contract's encode-side
/// behavior); the decoder then sees the saturated value, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Protocol version, currently 1.
    pub version: u8,
    /// Settlement network.
    pub network: Network,
    /// Settlement scheme.
    pub scheme: Scheme,
    /// Price in smallest token units, saturated to `u32::MAX` on construction.
    pub price: u32,
    /// Recipient account address.
    pub pay_to: [u8; 20],
    /// Authorization validity window in seconds, saturated to `u16::MAX`.
    pub timeout: u16,
    /// Small counter disambiguating repeated broadcasts within one session.
    pub nonce: u8,
}

impl PaymentRequest {
    /// Build a request, saturating `price` and `timeout` to the wire field
    /// maxima rather than truncating or erroring.
    #[must_use]
    pub fn new(
        version: u8,
        network: Network,
        scheme: Scheme,
        price: u64,
        pay_to: [u8; 20],
        timeout: u32,
        nonce: u8,
    ) -> Self {
        Self {
            version,
            network,
            scheme,
            price: u32::try_from(price).unwrap_or(u32::MAX),
            pay_to,
            timeout: u16::try_from(timeout).unwrap_or(u16::MAX),
            nonce,
        }
    }

    /// Size of the encoded wire form in bytes.
    pub const SIZE: usize = RawRequest::SIZE;

    /// Serialize to the fixed 30-byte wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let raw = RawRequest {
            version: self.version,
            network: self.network.id(),
            scheme: self.scheme.id(),
            price: self.price.to_be_bytes(),
            pay_to: self.pay_to,
            timeout: self.timeout.to_be_bytes(),
            nonce: self.nonce,
        };
        let bytes = IntoBytes::as_bytes(&raw);
        let mut arr = [0u8; Self::SIZE];
        arr.copy_from_slice(bytes);
        arr
    }

    /// Parse the first 30 bytes of `bytes`, ignoring any trailing bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferTooShort`] if `bytes` is shorter than 30
    /// bytes. Unknown network or scheme IDs never fail; they decode to the
    /// sentinel values documented on [`Network`] and [`Scheme`].
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let raw = RawRequest::ref_from_prefix(bytes)
            .map_err(|_| CodecError::BufferTooShort { expected: Self::SIZE, actual: bytes.len() })?
            .0;

        Ok(Self {
            version: raw.version,
            network: Network::from_id(raw.network),
            scheme: Scheme::from_id(raw.scheme),
            price: u32::from_be_bytes(raw.price),
            pay_to: raw.pay_to,
            timeout: u16::from_be_bytes(raw.timeout),
            nonce: raw.nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn sample() -> PaymentRequest {
        PaymentRequest::new(
            1,
            Network::BaseSepolia,
            Scheme::Exact,
            1000,
            [0x5b, 0x12, 0xEA, 0x8D, 0xC4, 0xf3, 0x7F, 0x49, 0x98, 0xd5, 0xA1, 0xBC, 0xf6, 0x3A,
             0xc9, 0xd6, 0xfd, 0x89, 0xbd, 0x4e],
            60,
            1,
        )
    }

    #[test]
    fn s1_request_round_trip() {
        let req = sample();
        let encoded = req.encode();
        assert_eq!(encoded.len(), 30);
        let decoded = PaymentRequest::decode(&encoded).expect("decode");
        assert_eq!(decoded, req);
        assert_eq!(decoded.network.asset_address(), Network::BaseSepolia.asset_address());
    }

    #[test]
    fn s5_saturation() {
        let req = PaymentRequest::new(
            1,
            Network::Base,
            Scheme::Exact,
            10_000_000_000,
            [0u8; 20],
            200_000,
            0,
        );
        assert_eq!(req.price, 0xFFFF_FFFF);
        assert_eq!(req.timeout, 0xFFFF);
        let decoded = PaymentRequest::decode(&req.encode()).expect("decode");
        assert_eq!(decoded.price, 4_294_967_295);
        assert_eq!(decoded.timeout, 0xFFFF);
    }

    #[test]
    fn short_buffer_fails() {
        assert!(matches!(
            PaymentRequest::decode(&[0u8; 10]),
            Err(CodecError::BufferTooShort { expected: 30, actual: 10 })
        ));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = sample().encode().to_vec();
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
        assert_eq!(PaymentRequest::decode(&bytes).expect("decode"), sample());
    }

    #[test]
    fn unknown_network_and_scheme_decode_to_sentinels() {
        let mut bytes = sample().encode();
        bytes[1] = 200; // network
        bytes[2] = 77; // scheme
        let decoded = PaymentRequest::decode(&bytes).expect("decode");
        assert_eq!(decoded.network, Network::BaseSepolia);
        assert_eq!(decoded.scheme, Scheme::Unknown(77));
    }

    proptest! {
        #[test]
        fn round_trip_preserves_non_saturating_fields(
            version in any::<u8>(),
            price in 0u32..=u32::MAX,
            pay_to in proptest::array::uniform20(any::<u8>()),
            timeout in 0u16..=u16::MAX,
            nonce in any::<u8>(),
        ) {
            let req = PaymentRequest::new(
                version, Network::Base, Scheme::Exact, u64::from(price), pay_to,
                u32::from(timeout), nonce,
            );
            let decoded = PaymentRequest::decode(&req.encode()).expect("decode");
            prop_assert_eq!(decoded, req);
        }
    }
}
