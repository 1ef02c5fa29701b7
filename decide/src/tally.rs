use crate::*;
use num_bigint::BigUint;

/// Decrypts every ballot of a closed voting.
pub struct TallyEngine<'a> {
    ballots: &'a dyn BallotStore,
    coordinator: &'a AuthorityCoordinator,
}

impl<'a> TallyEngine<'a> {
    pub fn new(ballots: &'a dyn BallotStore, coordinator: &'a AuthorityCoordinator) -> Self {
        TallyEngine {
            ballots,
            coordinator,
        }
    }

    /// Fetch and decrypt all ballots of `voting`, one plaintext per ballot.
    ///
    /// Either every ballot is decrypted or an error is returned; there is no
    /// partial tally. No ballots is an empty tally, not an error.
    pub fn tally(&self, voting: &Voting, token: &str) -> Result<Vec<BigUint>, Error> {
        let group = voting
            .group()
            .ok_or_else(|| Error::TallyFailed(format!("voting {} has no public key", voting.id)))?;

        let ciphertexts = match self.ballots.list(voting.id, token) {
            Ok(ciphertexts) => ciphertexts,
            Err(e @ Error::Unauthorized(_)) => return Err(e),
            Err(e) => return Err(Error::TallyFailed(format!("listing ballots: {}", e))),
        };
        validate_ciphertexts(&ciphertexts, &group)?;

        info!(
            "tallying {} ballots of voting {}",
            ciphertexts.len(),
            voting.id
        );

        self.coordinator
            .request_decryption(voting, &ciphertexts)
            .map_err(|e| match e {
                Error::TallyFailed(_) | Error::MalformedCiphertext { .. } => e,
                other => Error::TallyFailed(other.to_string()),
            })
    }
}

/// Check every ciphertext is a pair of group elements.
pub fn validate_ciphertexts(ciphertexts: &[Ciphertext], group: &GroupParams) -> Result<(), Error> {
    match ciphertexts.iter().position(|c| !c.is_well_formed(group)) {
        Some(index) => Err(Error::MalformedCiphertext { index }),
        None => Ok(()),
    }
}
