use crate::*;
use chrono::Utc;
use rand::rngs::OsRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError, Weak};
use uuid::Uuid;

/// The voting engine: creates votings and drives them through their lifecycle.
///
/// Transitions of the same voting are serialized on a per-voting lock, and
/// every commit is a compare-and-swap against the state the transition was
/// checked in. Cryptographic work is finished before anything is persisted,
/// so a failed transition leaves the stored voting untouched.
pub struct VotingService {
    config: Config,
    votings: Arc<dyn VotingStore>,
    ballots: Arc<dyn BallotStore>,
    census: Arc<dyn CensusCheck>,
    coordinator: AuthorityCoordinator,
    /// Entries live only while some caller holds the lock.
    locks: Mutex<HashMap<Uuid, Weak<Mutex<()>>>>,
}

impl VotingService {
    pub fn new(
        config: Config,
        votings: Arc<dyn VotingStore>,
        ballots: Arc<dyn BallotStore>,
        census: Arc<dyn CensusCheck>,
        coordinator: AuthorityCoordinator,
    ) -> Self {
        VotingService {
            config,
            votings,
            ballots,
            census,
            coordinator,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// A service backed entirely by one in-memory store.
    pub fn in_memory(
        config: Config,
        store: Arc<MemStore>,
        coordinator: AuthorityCoordinator,
    ) -> Self {
        Self::new(config, store.clone(), store.clone(), store, coordinator)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn coordinator(&self) -> &AuthorityCoordinator {
        &self.coordinator
    }

    /// Register a new voting. It starts out NOT_STARTED.
    pub fn create<S: Into<String>>(
        &self,
        name: S,
        description: S,
        question: VotingQuestion,
        authorities: Vec<Authority>,
    ) -> Result<Voting, Error> {
        if authorities.is_empty() {
            return Err(Error::InvalidVoting(
                "a voting needs at least one authority".into(),
            ));
        }
        let voting = Voting::new(name, description, question, authorities);
        self.votings.insert(voting.clone())?;
        info!("created voting {} ({})", voting.id, voting.name);
        Ok(voting)
    }

    pub fn get(&self, voting_id: Uuid) -> Result<Voting, Error> {
        self.votings.load(voting_id)
    }

    /// Start a voting: assemble its key from every authority and publish it.
    ///
    /// The group is fixed on the first attempt and stored with the voting, so
    /// after a failed assembly the authorities that did answer keep a share
    /// that is still valid for the retry.
    pub fn open(&self, voting_id: Uuid) -> Result<PublicKey, Error> {
        let lock = self.lock_for(voting_id)?;
        let _guard = acquire(&lock);

        let mut voting = self.votings.load(voting_id)?;
        check(&voting, Action::Start)?;

        let group = match voting.group_params.clone() {
            Some(group) => group,
            None => {
                let group = self
                    .config
                    .group_params(&mut OsRng)
                    .map_err(|e| Error::KeyAssemblyFailed(e.to_string()))?;
                check_capacity(&voting, &group)?;

                voting.group_params = Some(group.clone());
                self.commit(LifecycleState::NotStarted, Action::Start, voting.clone())?;
                debug!("voting {} fixed a {}-bit group", voting_id, group.p.bits());
                group
            }
        };
        check_capacity(&voting, &group)?;

        let public_key = self.coordinator.assemble_key(&voting, &group)?;

        voting.public_key = Some(public_key.clone());
        voting.start_time = Some(Utc::now());
        self.commit(LifecycleState::NotStarted, Action::Start, voting)?;

        info!("voting {} started", voting_id);
        Ok(public_key)
    }

    /// Stop accepting ballots.
    pub fn close(&self, voting_id: Uuid) -> Result<(), Error> {
        let lock = self.lock_for(voting_id)?;
        let _guard = acquire(&lock);

        let mut voting = self.votings.load(voting_id)?;
        check(&voting, Action::Stop)?;

        voting.end_time = Some(Utc::now());
        self.commit(LifecycleState::Started, Action::Stop, voting)?;

        info!("voting {} stopped", voting_id);
        Ok(())
    }

    /// Decrypt and postprocess every ballot. Runs at most once per voting.
    ///
    /// Rejected with `TallyInProgress` while another transition of the same
    /// voting is in flight, rather than waiting for it.
    pub fn tally(&self, voting_id: Uuid, token: &str) -> Result<PostProc, Error> {
        let lock = self.lock_for(voting_id)?;
        let _guard = match lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                debug!("tally of voting {} already in progress", voting_id);
                return Err(Error::TallyInProgress(voting_id));
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let mut voting = self.votings.load(voting_id)?;
        check(&voting, Action::Tally)?;

        let engine = TallyEngine::new(self.ballots.as_ref(), &self.coordinator);
        let plaintexts = engine.tally(&voting, token).map_err(|e| {
            error!("tally of voting {} failed: {}", voting_id, e);
            e
        })?;
        let postproc = PostProc::compute(&voting.question, &plaintexts)?;

        let count = plaintexts.len();
        voting.tally = Some(plaintexts.into_iter().map(HexUint::from).collect());
        voting.postproc = Some(postproc.clone());
        self.commit(LifecycleState::Stopped, Action::Tally, voting)?;

        info!("voting {} tallied with {} ballots", voting_id, count);
        Ok(postproc)
    }

    /// Apply an action by name and return its success message.
    pub fn apply(
        &self,
        voting_id: Uuid,
        action: &str,
        token: &str,
    ) -> Result<&'static str, Error> {
        let action: Action = action.parse()?;
        match action {
            Action::Start => self.open(voting_id).map(|_| ()),
            Action::Stop => self.close(voting_id),
            Action::Tally => self.tally(voting_id, token).map(|_| ()),
        }?;
        Ok(action.success_message())
    }

    /// Accept a voter's encrypted ballot.
    ///
    /// The voter must be in the census and the voting must be STARTED. Each
    /// voter votes once.
    pub fn submit_ballot(
        &self,
        voting_id: Uuid,
        voter_id: Uuid,
        ballot: Ciphertext,
    ) -> Result<(), Error> {
        if !self.census.is_eligible(voting_id, voter_id) {
            return Err(Error::BallotRejected(format!(
                "voter {} is not in the census of voting {}",
                voter_id, voting_id
            )));
        }

        // Hold the voting's lock so a concurrent close cannot slip in between
        // the state check and the write
        let lock = self.lock_for(voting_id)?;
        let _guard = acquire(&lock);

        let voting = self.votings.load(voting_id)?;
        let state = voting.state();
        if state != LifecycleState::Started {
            return Err(Error::BallotRejected(format!(
                "voting {} is {}",
                voting_id, state
            )));
        }

        let group = voting.group().ok_or_else(|| {
            Error::BallotRejected(format!("voting {} has no public key", voting_id))
        })?;
        if !ballot.is_well_formed(&group) {
            return Err(Error::BallotRejected(
                "ciphertext is not in the voting group".into(),
            ));
        }

        self.ballots.put(voting_id, voter_id, ballot)?;
        trace!("ballot accepted for voting {}", voting_id);
        Ok(())
    }

    // Only existing votings get a lock, and released locks are pruned.
    fn lock_for(&self, voting_id: Uuid) -> Result<Arc<Mutex<()>>, Error> {
        self.votings.load(voting_id)?;

        let mut locks = acquire(&self.locks);
        locks.retain(|_, lock| lock.strong_count() > 0);
        let lock = locks
            .get(&voting_id)
            .and_then(Weak::upgrade)
            .unwrap_or_default();
        locks.insert(voting_id, Arc::downgrade(&lock));
        Ok(lock)
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        acquire(&self.locks).len()
    }

    // Persist a checked transition. Losing the swap to another writer is
    // reported as whatever the winner's state makes of `action`.
    fn commit(
        &self,
        expected: LifecycleState,
        action: Action,
        voting: Voting,
    ) -> Result<(), Error> {
        let voting_id = voting.id;
        match self.votings.compare_and_swap(expected, voting) {
            Err(Error::ConcurrentModification(_)) => {
                let current = self.votings.load(voting_id)?;
                check(&current, action)?;
                Err(Error::ConcurrentModification(voting_id))
            }
            other => other,
        }
    }
}

fn check_capacity(voting: &Voting, group: &GroupParams) -> Result<(), Error> {
    let max_plaintext = voting.question.max_plaintext();
    if max_plaintext >= group.p {
        return Err(Error::KeyAssemblyFailed(format!(
            "a {}-bit modulus cannot hold ballots up to {}",
            group.p.bits(),
            max_plaintext
        )));
    }
    Ok(())
}

fn acquire<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{rng, small_group};
    use num_bigint::BigUint;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    struct Fixture {
        service: VotingService,
        store: Arc<MemStore>,
        voting: Voting,
    }

    fn config() -> Config {
        Config {
            keybits: 64,
            group: Some(small_group()),
            ..Config::default()
        }
    }

    fn fixture_with(
        config: Config,
        question: VotingQuestion,
        authorities: usize,
        wrap: impl Fn(usize, Arc<LocalAuthority>) -> Arc<dyn AuthorityClient>,
    ) -> Fixture {
        let authorities: Vec<Authority> = (0..authorities)
            .map(|i| Authority::new(format!("auth {}", i), format!("local://{}", i)))
            .collect();

        let mut coordinator = AuthorityCoordinator::new();
        for (i, authority) in authorities.iter().enumerate() {
            let local = Arc::new(LocalAuthority::with_rng(authority.id, rng(60 + i as u64)));
            coordinator.register(authority.id, wrap(i, local));
        }

        let store = Arc::new(MemStore::new());
        let service = VotingService::in_memory(config, store.clone(), coordinator);
        let voting = service.create("test", "", question, authorities).unwrap();
        Fixture {
            service,
            store,
            voting,
        }
    }

    fn fixture(question: VotingQuestion) -> Fixture {
        fixture_with(config(), question, 2, |_, local| {
            local as Arc<dyn AuthorityClient>
        })
    }

    fn default_question() -> VotingQuestion {
        let labels = vec!["a".into(), "b".into(), "c".into()];
        VotingQuestion::new("q", QuestionType::Default, labels).unwrap()
    }

    fn vote(f: &Fixture, choices: &[u32]) {
        let voting = f.service.get(f.voting.id).unwrap();
        let mut rng = rng(70);
        for choice in choices {
            let voter = Uuid::new_v4();
            f.store.add_voter(voting.id, voter);
            let ballot = voting.encrypt_choice(*choice, &mut rng).unwrap();
            f.service.submit_ballot(voting.id, voter, ballot).unwrap();
        }
    }

    #[test]
    fn full_lifecycle() {
        let f = fixture(default_question());
        let id = f.voting.id;

        let public_key = f.service.open(id).unwrap();
        let voting = f.service.get(id).unwrap();
        assert_eq!(voting.state(), LifecycleState::Started);
        assert_eq!(voting.public_key, Some(public_key));

        vote(&f, &[1, 1, 2, 3, 3, 3]);
        f.service.close(id).unwrap();

        let postproc = f.service.tally(id, "").unwrap();
        assert_eq!(postproc.order(), vec![3, 1, 2]);

        let voting = f.service.get(id).unwrap();
        assert_eq!(voting.state(), LifecycleState::Tallied);
        assert_eq!(voting.tally.as_ref().map(Vec::len), Some(6));
        assert_eq!(voting.postproc, Some(postproc));
    }

    #[test]
    fn apply_by_name() {
        let f = fixture(default_question());
        let id = f.voting.id;

        assert_eq!(f.service.apply(id, "start", "").unwrap(), "Voting started");
        let err = f.service.apply(id, "start", "").unwrap_err();
        assert_eq!(err.to_string(), "decide: Voting already started");
        assert!(err.is_lifecycle());

        let err = f.service.apply(id, "tally", "").unwrap_err();
        assert!(matches!(err, Error::Lifecycle(LifecycleError::NotStopped)));

        assert_eq!(f.service.apply(id, "stop", "").unwrap(), "Voting stopped");
        assert_eq!(f.service.apply(id, "tally", "").unwrap(), "Voting tallied");
        assert!(matches!(
            f.service.apply(id, "tally", ""),
            Err(Error::Lifecycle(LifecycleError::AlreadyTallied))
        ));
        assert!(matches!(
            f.service.apply(id, "publish", ""),
            Err(Error::Lifecycle(LifecycleError::UnknownAction(_)))
        ));
        assert!(matches!(
            f.service.apply(Uuid::new_v4(), "start", ""),
            Err(Error::VotingNotFound(_))
        ));
    }

    #[test]
    fn concurrent_start() {
        let f = fixture(default_question());
        let id = f.voting.id;
        let barrier = Barrier::new(8);

        let results: Vec<Result<&'static str, Error>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        f.service.apply(id, "start", "")
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let started = results
            .iter()
            .filter(|r| matches!(r, Ok("Voting started")))
            .count();
        assert_eq!(started, 1);
        for result in results.iter().filter(|r| r.is_err()) {
            assert_eq!(
                result.as_ref().unwrap_err().to_string(),
                "decide: Voting already started"
            );
        }

        // The published key is what the authorities' stored shares combine to
        let voting = f.service.get(id).unwrap();
        let key = voting.public_key.clone().unwrap();
        let again = f
            .service
            .coordinator()
            .assemble_key(&voting, &small_group())
            .unwrap();
        assert_eq!(key, again);
    }

    /// Slows down partial decryption and counts the calls.
    struct Slow {
        inner: Arc<LocalAuthority>,
        calls: Arc<AtomicUsize>,
    }

    impl AuthorityClient for Slow {
        fn get_share(&self, voting_id: Uuid, group: &GroupParams) -> Result<BigUint, Error> {
            self.inner.get_share(voting_id, group)
        }

        fn partial_decrypt(
            &self,
            voting_id: Uuid,
            ciphertexts: &[Ciphertext],
        ) -> Result<PartialDecryptionBatch, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(200));
            self.inner.partial_decrypt(voting_id, ciphertexts)
        }
    }

    #[test]
    fn concurrent_tally_is_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let f = fixture_with(config(), default_question(), 1, move |_, local| {
            Arc::new(Slow {
                inner: local,
                calls: counter.clone(),
            }) as Arc<dyn AuthorityClient>
        });
        let id = f.voting.id;

        f.service.open(id).unwrap();
        vote(&f, &[1, 2]);
        f.service.close(id).unwrap();

        let barrier = Barrier::new(2);
        let results: Vec<Result<PostProc, Error>> = thread::scope(|scope| {
            let first = scope.spawn(|| {
                barrier.wait();
                f.service.tally(id, "")
            });
            let second = scope.spawn(|| {
                barrier.wait();
                thread::sleep(Duration::from_millis(50));
                f.service.tally(id, "")
            });
            vec![first.join().unwrap(), second.join().unwrap()]
        });

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::TallyInProgress(_))));
        assert!(results[1].as_ref().unwrap_err().is_retriable());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Once finished, asking again is a plain lifecycle rejection
        assert!(matches!(
            f.service.tally(id, ""),
            Err(Error::Lifecycle(LifecycleError::AlreadyTallied))
        ));
    }

    /// An authority that can be taken offline.
    struct Switch {
        inner: Arc<LocalAuthority>,
        down: Arc<AtomicBool>,
    }

    impl AuthorityClient for Switch {
        fn get_share(&self, voting_id: Uuid, group: &GroupParams) -> Result<BigUint, Error> {
            if self.down.load(Ordering::SeqCst) {
                return Err(Error::Authority("unreachable".into()));
            }
            self.inner.get_share(voting_id, group)
        }

        fn partial_decrypt(
            &self,
            voting_id: Uuid,
            ciphertexts: &[Ciphertext],
        ) -> Result<PartialDecryptionBatch, Error> {
            if self.down.load(Ordering::SeqCst) {
                return Err(Error::Authority("unreachable".into()));
            }
            self.inner.partial_decrypt(voting_id, ciphertexts)
        }
    }

    fn switched() -> (Fixture, Arc<AtomicBool>) {
        let down = Arc::new(AtomicBool::new(false));
        let flag = down.clone();
        let f = fixture_with(config(), default_question(), 3, move |_, local| {
            Arc::new(Switch {
                inner: local,
                down: flag.clone(),
            }) as Arc<dyn AuthorityClient>
        });
        (f, down)
    }

    #[test]
    fn failed_key_assembly_publishes_nothing() {
        let (f, down) = switched();
        let id = f.voting.id;

        down.store(true, Ordering::SeqCst);
        let err = f.service.open(id).unwrap_err();
        assert!(matches!(err, Error::KeyAssemblyFailed(_)));
        assert!(err.is_retriable());
        let voting = f.service.get(id).unwrap();
        assert_eq!(voting.state(), LifecycleState::NotStarted);
        assert!(voting.public_key.is_none());
        assert!(voting.start_time.is_none());
        assert_eq!(voting.group_params, Some(small_group()));

        down.store(false, Ordering::SeqCst);
        f.service.open(id).unwrap();
    }

    #[test]
    fn open_retries_in_the_group_of_the_first_attempt() {
        let flags: Vec<Arc<AtomicBool>> = (0..2)
            .map(|_| Arc::new(AtomicBool::new(false)))
            .collect();
        let switches = flags.clone();
        let generated = Config {
            keybits: 32,
            group: None,
            ..Config::default()
        };
        let f = fixture_with(generated, default_question(), 2, move |i, local| {
            Arc::new(Switch {
                inner: local,
                down: switches[i].clone(),
            }) as Arc<dyn AuthorityClient>
        });
        let id = f.voting.id;

        // The first authority hands out its share, the second is unreachable
        flags[1].store(true, Ordering::SeqCst);
        let err = f.service.open(id).unwrap_err();
        assert!(matches!(err, Error::KeyAssemblyFailed(_)));

        let failed = f.service.get(id).unwrap();
        assert_eq!(failed.state(), LifecycleState::NotStarted);
        assert!(failed.public_key.is_none());
        let group = failed.group_params.clone().unwrap();
        assert_eq!(group.p.bits(), 32);

        flags[1].store(false, Ordering::SeqCst);
        let public_key = f.service.open(id).unwrap();
        assert_eq!(public_key.group(), group);
        assert_eq!(f.service.get(id).unwrap().group(), Some(group));

        vote(&f, &[2, 2, 1]);
        f.service.close(id).unwrap();
        assert_eq!(f.service.tally(id, "").unwrap().order(), vec![2, 1, 3]);
    }

    #[test]
    fn locks_are_not_kept_for_unknown_or_idle_votings() {
        let f = fixture(default_question());
        for _ in 0..1000 {
            assert!(matches!(
                f.service.apply(Uuid::new_v4(), "stop", ""),
                Err(Error::VotingNotFound(_))
            ));
        }
        assert_eq!(f.service.tracked_locks(), 0);

        let id = f.voting.id;
        f.service.open(id).unwrap();
        vote(&f, &[1]);
        f.service.close(id).unwrap();
        f.service.tally(id, "").unwrap();
        assert!(f.service.tracked_locks() <= 1);

        let other = f
            .service
            .create("other", "", default_question(), f.voting.authorities.clone())
            .unwrap();
        assert!(matches!(
            f.service.apply(other.id, "stop", ""),
            Err(Error::Lifecycle(LifecycleError::NotStarted))
        ));
        assert_eq!(f.service.tracked_locks(), 1);
    }

    #[test]
    fn missing_partial_decryption_leaves_tally_unset() {
        let (f, down) = switched();
        let id = f.voting.id;

        f.service.open(id).unwrap();
        vote(&f, &[1, 2, 2]);
        f.service.close(id).unwrap();
        let closed = f.service.get(id).unwrap();

        down.store(true, Ordering::SeqCst);
        let err = f.service.tally(id, "").unwrap_err();
        assert!(matches!(err, Error::TallyFailed(_)));

        let voting = f.service.get(id).unwrap();
        assert_eq!(voting, closed);
        assert!(voting.tally.is_none());
        assert!(voting.postproc.is_none());

        down.store(false, Ordering::SeqCst);
        assert_eq!(f.service.tally(id, "").unwrap().order(), vec![2, 1, 3]);
    }

    #[test]
    fn ranking_voting() {
        let question = VotingQuestion::new(
            "rank",
            QuestionType::Ranking,
            vec!["x".into(), "y".into(), "z".into()],
        )
        .unwrap();
        let f = fixture(question);
        let id = f.voting.id;
        f.service.open(id).unwrap();

        let voting = f.service.get(id).unwrap();
        let mut rng = rng(71);
        for ranking in [[1u32, 2, 3], [2, 3, 1], [1, 2, 3]].iter() {
            let voter = Uuid::new_v4();
            f.store.add_voter(id, voter);
            let ballot = voting.encrypt_ranking(ranking, &mut rng).unwrap();
            f.service.submit_ballot(id, voter, ballot).unwrap();
        }
        f.service.close(id).unwrap();

        match f.service.tally(id, "").unwrap() {
            PostProc::Ranked {
                options,
                permutations,
            } => {
                let scores: Vec<(u32, u64)> =
                    options.iter().map(|o| (o.number, o.score)).collect();
                assert_eq!(scores, vec![(1, 7), (2, 7), (3, 4)]);
                assert_eq!(permutations[0].encoded, BigUint::from(123u32));
                assert_eq!(permutations[0].votes, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn group_too_small_for_ranking() {
        // 11 options encode to 22 digits, more than a 64-bit modulus holds
        let labels = (1..=11).map(|i| i.to_string()).collect();
        let question = VotingQuestion::new("big", QuestionType::Ranking, labels).unwrap();
        let f = fixture(question);
        let err = f.service.open(f.voting.id).unwrap_err();
        assert!(matches!(err, Error::KeyAssemblyFailed(_)));
        assert_eq!(f.service.get(f.voting.id).unwrap().state(), LifecycleState::NotStarted);
    }

    #[test]
    fn ballot_gate() {
        let f = fixture(default_question());
        let id = f.voting.id;
        let voter = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        f.store.add_voter(id, voter);

        let junk = Ciphertext {
            a: BigUint::from(2u32),
            b: BigUint::from(3u32),
        };
        // Not started yet
        assert!(matches!(
            f.service.submit_ballot(id, voter, junk.clone()),
            Err(Error::BallotRejected(_))
        ));

        f.service.open(id).unwrap();
        let voting = f.service.get(id).unwrap();
        let mut rng = rng(72);
        let ballot = voting.encrypt_choice(2, &mut rng).unwrap();

        assert!(f.service.submit_ballot(id, stranger, ballot.clone()).is_err());
        let outside = Ciphertext {
            a: voting.public_key.clone().unwrap().p,
            b: BigUint::from(3u32),
        };
        assert!(f.service.submit_ballot(id, voter, outside).is_err());

        f.service.submit_ballot(id, voter, ballot.clone()).unwrap();
        assert!(f.service.submit_ballot(id, voter, ballot.clone()).is_err());
        assert_eq!(f.store.ballot_count(id), 1);

        f.service.close(id).unwrap();
        let late = Uuid::new_v4();
        f.store.add_voter(id, late);
        assert!(f.service.submit_ballot(id, late, ballot).is_err());
    }

    #[test]
    fn create_requires_authorities() {
        let store = Arc::new(MemStore::new());
        let service = VotingService::in_memory(config(), store, AuthorityCoordinator::new());
        assert!(matches!(
            service.create("v", "", default_question(), vec![]),
            Err(Error::InvalidVoting(_))
        ));
    }
}
