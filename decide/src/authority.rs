use crate::*;
use num_bigint::BigUint;
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread;
use uuid::Uuid;

/// One authority's partial decryptions of a batch of ciphertexts, in batch order.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PartialDecryptionBatch {
    pub authority_id: Uuid,

    /// `batch_digest` of the ciphertexts these partials answer
    pub digest: String,

    pub partials: Vec<HexUint>,
}

/// Hex SHA-256 digest binding a batch of ciphertexts to its voting.
pub fn batch_digest(voting_id: Uuid, ciphertexts: &[Ciphertext]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(voting_id.as_bytes());
    hasher.update((ciphertexts.len() as u64).to_be_bytes());
    for ciphertext in ciphertexts {
        for part in [&ciphertext.a, &ciphertext.b].iter() {
            let bytes = part.to_bytes_be();
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(&bytes);
        }
    }
    hex::encode(hasher.finalize())
}

/// Connection to a single authority.
///
/// Implementations may live in-process or behind a network boundary; the
/// coordinator cannot tell the difference.
pub trait AuthorityClient: Send + Sync {
    /// The authority's public share `y_i` for a voting. Asking twice for the
    /// same voting returns the same share.
    fn get_share(&self, voting_id: Uuid, group: &GroupParams) -> Result<BigUint, Error>;

    /// `a^{x_i}` for every ciphertext, in order.
    fn partial_decrypt(
        &self,
        voting_id: Uuid,
        ciphertexts: &[Ciphertext],
    ) -> Result<PartialDecryptionBatch, Error>;
}

/// An authority running inside this process.
pub struct LocalAuthority {
    id: Uuid,
    shares: Mutex<HashMap<Uuid, (GroupParams, KeyShare)>>,
    rng: Mutex<ChaCha20Rng>,
}

impl LocalAuthority {
    pub fn new(id: Uuid) -> Self {
        Self::with_rng(id, ChaCha20Rng::from_entropy())
    }

    /// An authority drawing its private exponents from the given rng.
    pub fn with_rng(id: Uuid, rng: ChaCha20Rng) -> Self {
        LocalAuthority {
            id,
            shares: Mutex::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    fn share_for(&self, voting_id: Uuid) -> Result<(GroupParams, KeyShare), Error> {
        self.shares
            .lock()
            .map_err(|_| Error::Authority("key share store poisoned".into()))?
            .get(&voting_id)
            .cloned()
            .ok_or_else(|| {
                Error::Authority(format!(
                    "authority {} holds no key share for voting {}",
                    self.id, voting_id
                ))
            })
    }
}

impl AuthorityClient for LocalAuthority {
    fn get_share(&self, voting_id: Uuid, group: &GroupParams) -> Result<BigUint, Error> {
        let mut shares = self
            .shares
            .lock()
            .map_err(|_| Error::Authority("key share store poisoned".into()))?;

        if let Some((existing, share)) = shares.get(&voting_id) {
            if existing != group {
                return Err(Error::Authority(format!(
                    "voting {} already has a key share in a different group",
                    voting_id
                )));
            }
            return Ok(share.public().clone());
        }

        let share = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| Error::Authority("rng poisoned".into()))?;
            generate_share(group, &mut *rng)
        };
        debug!("authority {} generated share for voting {}", self.id, voting_id);

        let y = share.public().clone();
        shares.insert(voting_id, (group.clone(), share));
        Ok(y)
    }

    fn partial_decrypt(
        &self,
        voting_id: Uuid,
        ciphertexts: &[Ciphertext],
    ) -> Result<PartialDecryptionBatch, Error> {
        let (group, share) = self.share_for(voting_id)?;

        let partials = ciphertexts
            .iter()
            .enumerate()
            .map(|(index, ciphertext)| {
                if !ciphertext.is_well_formed(&group) {
                    return Err(Error::MalformedCiphertext { index });
                }
                Ok(HexUint(partial_decrypt(ciphertext, &share, &group)))
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(PartialDecryptionBatch {
            authority_id: self.id,
            digest: batch_digest(voting_id, ciphertexts),
            partials,
        })
    }
}

/// Talks to every authority of a voting to assemble its key and decrypt its ballots.
#[derive(Default, Clone)]
pub struct AuthorityCoordinator {
    clients: HashMap<Uuid, Arc<dyn AuthorityClient>>,
}

impl AuthorityCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route calls for `authority_id` through `client`.
    pub fn register(&mut self, authority_id: Uuid, client: Arc<dyn AuthorityClient>) {
        self.clients.insert(authority_id, client);
    }

    pub fn unregister(&mut self, authority_id: Uuid) -> Option<Arc<dyn AuthorityClient>> {
        self.clients.remove(&authority_id)
    }

    /// Collect a public share from every authority and combine them.
    ///
    /// Nothing is returned unless every authority answered with an element
    /// of the prime-order subgroup.
    pub fn assemble_key(&self, voting: &Voting, group: &GroupParams) -> Result<PublicKey, Error> {
        if voting.authorities.is_empty() {
            return Err(Error::KeyAssemblyFailed(format!(
                "voting {} has no authorities",
                voting.id
            )));
        }

        let results = self.fan_out(voting, |client| client.get_share(voting.id, group));

        let mut shares = Vec::with_capacity(results.len());
        for (authority, result) in results {
            match result {
                Ok(y) if group.in_subgroup(&y) => shares.push(y),
                Ok(_) => {
                    warn!("authority {} returned an invalid share", authority.id);
                    return Err(Error::KeyAssemblyFailed(format!(
                        "share from authority {} is not in the voting group",
                        authority.name
                    )));
                }
                Err(e) => {
                    warn!("authority {} failed to provide a share: {}", authority.id, e);
                    return Err(Error::KeyAssemblyFailed(format!(
                        "authority {}: {}",
                        authority.name, e
                    )));
                }
            }
        }

        let public_key = combine_public_shares(group, &shares)?;
        info!(
            "assembled key for voting {} from {} authorities",
            voting.id,
            shares.len()
        );
        Ok(public_key)
    }

    /// Decrypt `ciphertexts` with the cooperation of every authority.
    ///
    /// Each authority is asked once for the whole batch. Any failure, or any
    /// answer that does not match the batch, aborts the whole decryption.
    pub fn request_decryption(
        &self,
        voting: &Voting,
        ciphertexts: &[Ciphertext],
    ) -> Result<Vec<BigUint>, Error> {
        let group = voting
            .group()
            .ok_or_else(|| Error::TallyFailed(format!("voting {} has no public key", voting.id)))?;

        if ciphertexts.is_empty() {
            return Ok(Vec::new());
        }

        let digest = batch_digest(voting.id, ciphertexts);
        let results = self.fan_out(voting, |client| client.partial_decrypt(voting.id, ciphertexts));

        let mut batches = Vec::with_capacity(results.len());
        for (authority, result) in results {
            let batch = result.map_err(|e| {
                warn!("authority {} failed to decrypt: {}", authority.id, e);
                Error::TallyFailed(format!("authority {}: {}", authority.name, e))
            })?;

            if batch.authority_id != authority.id {
                return Err(Error::DecryptionFailure(format!(
                    "answer for authority {} came from {}",
                    authority.id, batch.authority_id
                )));
            }
            if batch.digest != digest || batch.partials.len() != ciphertexts.len() {
                return Err(Error::DecryptionFailure(format!(
                    "authority {} answered for a different ciphertext batch",
                    authority.name
                )));
            }
            batches.push(batch);
        }

        let plaintexts = ciphertexts
            .iter()
            .enumerate()
            .map(|(index, ciphertext)| {
                let partials: Vec<BigUint> = batches
                    .iter()
                    .map(|batch| batch.partials[index].0.clone())
                    .collect();
                combine_decryption(&ciphertext.b, &partials, &group)
            })
            .collect::<Result<Vec<_>, Error>>()?;

        debug!(
            "decrypted {} ballots of voting {}",
            plaintexts.len(),
            voting.id
        );
        Ok(plaintexts)
    }

    // One scoped thread per authority, gathered in authority order.
    fn fan_out<'v, T, F>(
        &self,
        voting: &'v Voting,
        call: F,
    ) -> Vec<(&'v Authority, Result<T, Error>)>
    where
        T: Send,
        F: Fn(&dyn AuthorityClient) -> Result<T, Error> + Sync,
    {
        let call = &call;
        thread::scope(|scope| {
            let handles: Vec<_> = voting
                .authorities
                .iter()
                .map(|authority| {
                    let client = self.clients.get(&authority.id).cloned();
                    let handle = scope.spawn(move || match client {
                        Some(client) => call(client.as_ref()),
                        None => Err(Error::Authority(format!(
                            "no client registered for authority {}",
                            authority.id
                        ))),
                    });
                    (authority, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(authority, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        Err(Error::Authority("authority call panicked".into()))
                    });
                    (authority, result)
                })
                .collect()
        })
    }
}
