use num_bigint::BigUint;
use std::borrow::Cow;
use std::convert::Infallible;

pub use hex_buffer_serde::Hex;

// a single-purpose type for use in `#[serde(with)]`
pub enum BigUintHex {}

impl Hex<BigUint> for BigUintHex {
    type Error = Infallible;

    fn create_bytes(value: &BigUint) -> Cow<'_, [u8]> {
        value.to_bytes_be().into()
    }

    fn from_bytes(bytes: &[u8]) -> Result<BigUint, Self::Error> {
        Ok(BigUint::from_bytes_be(bytes))
    }
}

/// A big integer that serializes as a hex string on its own.
///
/// Used where a bare `BigUint` would otherwise sit inside a `Vec` and could not
/// carry a `#[serde(with)]` attribute.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct HexUint(#[serde(with = "BigUintHex")] pub BigUint);

impl From<BigUint> for HexUint {
    fn from(value: BigUint) -> Self {
        HexUint(value)
    }
}

impl From<HexUint> for BigUint {
    fn from(value: HexUint) -> Self {
        value.0
    }
}

impl AsRef<BigUint> for HexUint {
    fn as_ref(&self) -> &BigUint {
        &self.0
    }
}
