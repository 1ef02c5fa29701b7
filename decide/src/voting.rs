use crate::*;
use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use rand::Rng;
use uuid::Uuid;

/// A party holding one share of a voting's decryption key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Authority {
    pub id: Uuid,
    pub name: String,

    /// Base URL the authority is reached at
    pub url: String,

    /// Set on the record describing this node
    #[serde(default)]
    pub me: bool,
}

impl Authority {
    pub fn new<S: Into<String>>(name: S, url: S) -> Self {
        Authority {
            id: Uuid::new_v4(),
            name: name.into(),
            url: url.into(),
            me: false,
        }
    }
}

/// A voting and its lifecycle fields.
///
/// The lifecycle state is never stored. It is derived from which of
/// `start_time`, `end_time` and `tally` are set, see `LifecycleState::of`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Voting {
    pub id: Uuid,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub question: VotingQuestion,
    pub authorities: Vec<Authority>,

    /// Fixed the first time an open is attempted, so a retried open asks the
    /// authorities for shares in the same group.
    #[serde(default)]
    pub group_params: Option<GroupParams>,

    /// Set together with `start_time`
    #[serde(default)]
    pub public_key: Option<PublicKey>,

    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    /// Decrypted plaintexts, one per ballot. Set together with `postproc`.
    #[serde(default)]
    pub tally: Option<Vec<HexUint>>,

    #[serde(default)]
    pub postproc: Option<PostProc>,
}

impl Voting {
    pub fn new<S: Into<String>>(
        name: S,
        description: S,
        question: VotingQuestion,
        authorities: Vec<Authority>,
    ) -> Self {
        Voting {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            question,
            authorities,
            group_params: None,
            public_key: None,
            start_time: None,
            end_time: None,
            tally: None,
            postproc: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::of(self)
    }

    /// Group parameters of the voting, once an open has fixed them.
    pub fn group(&self) -> Option<GroupParams> {
        self.group_params
            .clone()
            .or_else(|| self.public_key.as_ref().map(PublicKey::group))
    }

    /// The tally as plain integers
    pub fn tally_values(&self) -> Option<Vec<BigUint>> {
        self.tally
            .as_ref()
            .map(|tally| tally.iter().map(|v| v.0.clone()).collect())
    }

    /// Encrypt a single-choice ballot under the published key.
    pub fn encrypt_choice<R: Rng + ?Sized>(
        &self,
        number: u32,
        rng: &mut R,
    ) -> Result<Ciphertext, Error> {
        let public_key = self.public_key.as_ref().ok_or(LifecycleError::NotStarted)?;
        let plaintext = self.question.encode_choice(number)?;
        encrypt(&plaintext, public_key, rng)
    }

    /// Encrypt a ranking ballot, most preferred option first.
    pub fn encrypt_ranking<R: Rng + ?Sized>(
        &self,
        ranking: &[u32],
        rng: &mut R,
    ) -> Result<Ciphertext, Error> {
        let public_key = self.public_key.as_ref().ok_or(LifecycleError::NotStarted)?;
        let plaintext = self.question.encode_ranking(ranking)?;
        encrypt(&plaintext, public_key, rng)
    }

    /// Pack into CBOR bytes
    pub fn as_bytes(&self) -> Vec<u8> {
        serde_cbor::to_vec(self).expect("decide: Unexpected error packing voting")
    }

    /// Unpack from JSON or CBOR bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        from_json_or_cbor(bytes)
    }
}
