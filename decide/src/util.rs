use crate::*;
use num_bigint::{BigUint, RandBigInt};
use num_bigint_dig::prime::probably_prime;
use num_traits::One;
use rand::Rng;
use serde::de::DeserializeOwned;

/// Miller-Rabin rounds run on top of the Baillie-PSW test when checking group parameters.
pub const MILLER_RABIN_ROUNDS: usize = 20;

/// Sample uniformly from the inclusive range `[low, high]`.
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, low: &BigUint, high: &BigUint) -> BigUint {
    let upper = high + 1u32;
    rng.gen_biguint_range(low, &upper)
}

/// `a * b mod p`
pub fn mod_mul(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    (a * b) % p
}

/// Product of all `values` modulo `p`. The empty product is 1.
pub fn mod_product<'a, I>(values: I, p: &BigUint) -> BigUint
where
    I: IntoIterator<Item = &'a BigUint>,
{
    values
        .into_iter()
        .fold(BigUint::one(), |acc, v| mod_mul(&acc, v, p))
}

/// Probabilistic primality test.
pub fn is_probable_prime(n: &BigUint) -> bool {
    let n = num_bigint_dig::BigUint::from_bytes_be(&n.to_bytes_be());
    probably_prime(&n, MILLER_RABIN_ROUNDS)
}

/// Find a safe prime `p = 2q + 1` of exactly `bits` bits. Returns `(p, q)`.
pub fn generate_safe_prime<R: Rng + ?Sized>(
    bits: u64,
    rng: &mut R,
) -> Result<(BigUint, BigUint), Error> {
    if bits < MIN_KEYBITS {
        return Err(Error::InvalidGroup(format!(
            "{} bits is below the minimum of {}",
            bits, MIN_KEYBITS
        )));
    }

    let one = BigUint::one();
    let top = &one << (bits - 2);

    loop {
        let candidate = rng.gen_biguint(bits - 1);
        let q = &candidate | &top | &one;
        if !is_probable_prime(&q) {
            continue;
        }

        let p = (&q << 1u32) + 1u32;
        if is_probable_prime(&p) {
            trace!("found {}-bit safe prime", p.bits());
            return Ok((p, q));
        }
    }
}

/// Wire format of a serialized record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Cbor,
}

impl Format {
    /// Records are maps: JSON ones open with `{`, CBOR ones with a map header.
    pub fn detect(bytes: &[u8]) -> Result<Format, Error> {
        match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => Ok(Format::Json),
            Some(_) => Ok(Format::Cbor),
            None => Err(Error::DeserializationUnknownFormat),
        }
    }
}

/// Deserialize a record from either JSON or CBOR.
pub fn from_json_or_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    match Format::detect(bytes)? {
        Format::Json => Ok(serde_json::from_slice(bytes)?),
        Format::Cbor => Ok(serde_cbor::from_slice(bytes)?),
    }
}
