use crate::*;
use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::Rng;
use std::fmt;

/// A multiplicative group modulo a safe prime `p = 2q + 1`, with `g` generating
/// the subgroup of prime order `q`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct GroupParams {
    #[serde(with = "BigUintHex")]
    pub p: BigUint,

    #[serde(with = "BigUintHex")]
    pub g: BigUint,
}

impl GroupParams {
    pub fn new(p: BigUint, g: BigUint) -> Self {
        GroupParams { p, g }
    }

    /// Generate fresh group parameters with a `bits`-bit safe prime.
    pub fn generate<R: Rng + ?Sized>(bits: u64, rng: &mut R) -> Result<Self, Error> {
        let (p, _q) = generate_safe_prime(bits, rng)?;

        // Squaring any h outside {0, 1, p-1} lands on a generator of the order-q subgroup
        let two = BigUint::from(2u32);
        let p_minus_two = &p - 2u32;
        let h = random_between(rng, &two, &p_minus_two);
        let g = h.modpow(&two, &p);

        debug!("generated {}-bit group", p.bits());
        Ok(GroupParams { p, g })
    }

    /// Order of the subgroup generated by `g`.
    pub fn q(&self) -> BigUint {
        (&self.p - 1u32) >> 1u32
    }

    /// True if `1 <= value < p`.
    pub fn contains(&self, value: &BigUint) -> bool {
        !value.is_zero() && value < &self.p
    }

    /// True if `value` is a non-identity element of the order-q subgroup.
    pub fn in_subgroup(&self, value: &BigUint) -> bool {
        value > &BigUint::one() && value < &self.p && value.modpow(&self.q(), &self.p).is_one()
    }

    /// Check that the parameters are fit for key setup.
    ///
    /// This is expensive and is only meant to run when a voting is opened.
    pub fn validate(&self, min_bits: u64) -> Result<(), Error> {
        if self.p.bits() < min_bits {
            return Err(Error::InvalidGroup(format!(
                "modulus has {} bits, at least {} required",
                self.p.bits(),
                min_bits
            )));
        }
        if !is_probable_prime(&self.p) {
            return Err(Error::InvalidGroup("modulus is not prime".into()));
        }
        if !is_probable_prime(&self.q()) {
            return Err(Error::InvalidGroup("modulus is not a safe prime".into()));
        }
        if !self.in_subgroup(&self.g) {
            return Err(Error::InvalidGroup(
                "generator does not generate the prime-order subgroup".into(),
            ));
        }
        Ok(())
    }
}

/// The voting public key: group parameters plus the combined `y`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct PublicKey {
    #[serde(with = "BigUintHex")]
    pub p: BigUint,

    #[serde(with = "BigUintHex")]
    pub g: BigUint,

    #[serde(with = "BigUintHex")]
    pub y: BigUint,
}

impl PublicKey {
    pub fn group(&self) -> GroupParams {
        GroupParams::new(self.p.clone(), self.g.clone())
    }
}

/// One authority's share of the voting key.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct KeyShare {
    #[serde(with = "BigUintHex")]
    x: BigUint,

    #[serde(with = "BigUintHex")]
    pub y: BigUint,
}

impl KeyShare {
    /// Rebuild a share from its private exponent.
    pub fn from_private(x: BigUint, group: &GroupParams) -> Self {
        let y = group.g.modpow(&x, &group.p);
        KeyShare { x, y }
    }

    pub fn public(&self) -> &BigUint {
        &self.y
    }
}

// Never print the private exponent
impl fmt::Debug for KeyShare {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("KeyShare")
            .field("x", &"<redacted>")
            .field("y", &self.y)
            .finish()
    }
}

/// An ElGamal ciphertext `(a, b) = (g^k, m * y^k)`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Hash)]
pub struct Ciphertext {
    #[serde(with = "BigUintHex")]
    pub a: BigUint,

    #[serde(with = "BigUintHex")]
    pub b: BigUint,
}

impl Ciphertext {
    /// Both components are elements of the group.
    pub fn is_well_formed(&self, group: &GroupParams) -> bool {
        group.contains(&self.a) && group.contains(&self.b)
    }
}

/// Sample a private exponent `x` in `[1, p-2]` and compute `y = g^x mod p`.
pub fn generate_share<R: Rng + ?Sized>(group: &GroupParams, rng: &mut R) -> KeyShare {
    let one = BigUint::one();
    let p_minus_two = &group.p - 2u32;
    let x = random_between(rng, &one, &p_minus_two);
    KeyShare::from_private(x, group)
}

/// Combine every authority's public share into the voting key: `y = Π y_i mod p`.
///
/// The product is commutative, so the order of `shares` does not matter.
pub fn combine_public_shares(group: &GroupParams, shares: &[BigUint]) -> Result<PublicKey, Error> {
    if shares.is_empty() {
        return Err(Error::KeyAssemblyFailed("no public shares to combine".into()));
    }
    if let Some(bad) = shares.iter().position(|y| !group.contains(y)) {
        return Err(Error::KeyAssemblyFailed(format!(
            "public share {} is not a group element",
            bad
        )));
    }

    Ok(PublicKey {
        p: group.p.clone(),
        g: group.g.clone(),
        y: mod_product(shares, &group.p),
    })
}

/// Encrypt a plaintext integer `1 <= m < p` under the voting key.
pub fn encrypt<R: Rng + ?Sized>(
    m: &BigUint,
    public_key: &PublicKey,
    rng: &mut R,
) -> Result<Ciphertext, Error> {
    let p = &public_key.p;
    if m.is_zero() || m >= p {
        return Err(Error::InvalidPlaintext(format!(
            "plaintext must satisfy 1 <= m < p ({} bits)",
            p.bits()
        )));
    }

    let one = BigUint::one();
    let p_minus_two = p - 2u32;
    let k = random_between(rng, &one, &p_minus_two);

    let a = public_key.g.modpow(&k, p);
    let b = mod_mul(m, &public_key.y.modpow(&k, p), p);

    Ok(Ciphertext { a, b })
}

/// One authority's contribution to decrypting `ciphertext`: `a^x mod p`.
pub fn partial_decrypt(ciphertext: &Ciphertext, share: &KeyShare, group: &GroupParams) -> BigUint {
    ciphertext.a.modpow(&share.x, &group.p)
}

/// Recover `m = b / Π a^{x_i} mod p` from every authority's partial decryption.
pub fn combine_decryption(
    b: &BigUint,
    partials: &[BigUint],
    group: &GroupParams,
) -> Result<BigUint, Error> {
    if partials.is_empty() {
        return Err(Error::DecryptionFailure("no partial decryptions".into()));
    }
    if partials.iter().any(|partial| !group.contains(partial)) {
        return Err(Error::DecryptionFailure(
            "partial decryption is not a group element".into(),
        ));
    }

    let p = &group.p;
    let shared_secret = mod_product(partials, p);
    let inverse = shared_secret
        .modinv(p)
        .ok_or_else(|| Error::DecryptionFailure("combined partials are not invertible".into()))?;

    // Partials computed for another ciphertext still combine to some group
    // element; batches are bound to their ciphertexts by the batch digest.
    Ok(mod_mul(b, &inverse, p))
}

/// Decrypt with every share held locally. Mostly useful for tests and
/// single-authority deployments.
pub fn decrypt_with_shares(
    ciphertext: &Ciphertext,
    shares: &[KeyShare],
    group: &GroupParams,
) -> Result<BigUint, Error> {
    let partials: Vec<BigUint> = shares
        .iter()
        .map(|share| partial_decrypt(ciphertext, share, group))
        .collect();
    combine_decryption(&ciphertext.b, &partials, group)
}
