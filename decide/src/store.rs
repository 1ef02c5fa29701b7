use crate::*;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

/// Persistence for votings.
///
/// Records are replaced whole. A transition is committed with
/// `compare_and_swap`, which only succeeds if the stored record is still in
/// the state the transition was checked against.
pub trait VotingStore: Send + Sync {
    /// Store a new voting. Fails if the id is already taken.
    fn insert(&self, voting: Voting) -> Result<(), Error>;

    /// Get a copy of a voting
    fn load(&self, id: Uuid) -> Result<Voting, Error>;

    /// Replace the stored voting if its current state is `expected`.
    fn compare_and_swap(&self, expected: LifecycleState, voting: Voting) -> Result<(), Error>;
}

/// Persistence for encrypted ballots.
pub trait BallotStore: Send + Sync {
    /// Store a voter's ballot. Each voter may cast one ballot per voting.
    fn put(&self, voting_id: Uuid, voter_id: Uuid, ballot: Ciphertext) -> Result<(), Error>;

    /// All ballots of a voting, in the order they were cast.
    fn list(&self, voting_id: Uuid, token: &str) -> Result<Vec<Ciphertext>, Error>;
}

/// Voter eligibility, owned by the census.
pub trait CensusCheck: Send + Sync {
    fn is_eligible(&self, voting_id: Uuid, voter_id: Uuid) -> bool;
}

/// A simple store that keeps everything in memory.
#[derive(Default)]
pub struct MemStore {
    votings: Mutex<BTreeMap<Uuid, Voting>>,
    ballots: Mutex<BTreeMap<Uuid, IndexMap<Uuid, Ciphertext>>>,
    census: Mutex<HashSet<(Uuid, Uuid)>>,

    /// Token required to list ballots, if any
    token: Option<String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that only lists ballots for callers presenting `token`.
    pub fn with_token<S: Into<String>>(token: S) -> Self {
        MemStore {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Add a voter to a voting's census.
    pub fn add_voter(&self, voting_id: Uuid, voter_id: Uuid) {
        lock(&self.census).insert((voting_id, voter_id));
    }

    /// Number of ballots cast in a voting
    pub fn ballot_count(&self, voting_id: Uuid) -> usize {
        lock(&self.ballots)
            .get(&voting_id)
            .map(|b| b.len())
            .unwrap_or(0)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl VotingStore for MemStore {
    fn insert(&self, voting: Voting) -> Result<(), Error> {
        let mut votings = lock(&self.votings);
        if votings.contains_key(&voting.id) {
            return Err(Error::ConcurrentModification(voting.id));
        }
        votings.insert(voting.id, voting);
        Ok(())
    }

    fn load(&self, id: Uuid) -> Result<Voting, Error> {
        lock(&self.votings)
            .get(&id)
            .cloned()
            .ok_or(Error::VotingNotFound(id))
    }

    fn compare_and_swap(&self, expected: LifecycleState, voting: Voting) -> Result<(), Error> {
        let mut votings = lock(&self.votings);
        let current = votings
            .get_mut(&voting.id)
            .ok_or(Error::VotingNotFound(voting.id))?;
        if current.state() != expected {
            return Err(Error::ConcurrentModification(voting.id));
        }
        *current = voting;
        Ok(())
    }
}

impl BallotStore for MemStore {
    fn put(&self, voting_id: Uuid, voter_id: Uuid, ballot: Ciphertext) -> Result<(), Error> {
        let mut ballots = lock(&self.ballots);
        let cast = ballots.entry(voting_id).or_default();
        if cast.contains_key(&voter_id) {
            return Err(Error::BallotRejected(format!(
                "voter {} already voted in {}",
                voter_id, voting_id
            )));
        }
        cast.insert(voter_id, ballot);
        Ok(())
    }

    fn list(&self, voting_id: Uuid, token: &str) -> Result<Vec<Ciphertext>, Error> {
        if let Some(expected) = &self.token {
            if expected != token {
                return Err(Error::Unauthorized("invalid token for ballot store".into()));
            }
        }
        Ok(lock(&self.ballots)
            .get(&voting_id)
            .map(|cast| cast.values().cloned().collect())
            .unwrap_or_default())
    }
}

impl CensusCheck for MemStore {
    fn is_eligible(&self, voting_id: Uuid, voter_id: Uuid) -> bool {
        lock(&self.census).contains(&(voting_id, voter_id))
    }
}
