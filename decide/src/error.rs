use thiserror::Error;
use uuid::Uuid;

/// Lifecycle sequencing errors
///
/// These are terminal and caused by the caller asking for a transition the voting
/// is not in a position to make. They are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Voting already started")]
    AlreadyStarted,

    #[error("Voting is not started")]
    NotStarted,

    #[error("Voting already stopped")]
    AlreadyStopped,

    #[error("Voting is not stopped")]
    NotStopped,

    #[error("Voting already tallied")]
    AlreadyTallied,

    #[error("Action not found, try with start, stop or tally (got {0:?})")]
    UnknownAction(String),
}

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("decide: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("decide: key assembly failed: {0}")]
    KeyAssemblyFailed(String),

    #[error("decide: tally failed: {0}")]
    TallyFailed(String),

    #[error("decide: a tally is already in progress for voting {0}")]
    TallyInProgress(Uuid),

    #[error("decide: decryption failed: {0}")]
    DecryptionFailure(String),

    #[error("decide: malformed ciphertext for ballot {index}")]
    MalformedCiphertext { index: usize },

    #[error("decide: plaintext of ballot {index} is out of range")]
    PlaintextOutOfRange { index: usize },

    #[error("decide: invalid plaintext: {0}")]
    InvalidPlaintext(String),

    #[error("decide: ballot {index} is not a valid ranking of {options} options")]
    InvalidRankingBallot { index: usize, options: usize },

    #[error("decide: invalid question: {0}")]
    InvalidQuestion(String),

    #[error("decide: invalid voting: {0}")]
    InvalidVoting(String),

    #[error("decide: invalid group parameters: {0}")]
    InvalidGroup(String),

    #[error("decide: voting {0} not found")]
    VotingNotFound(Uuid),

    #[error("decide: voting {0} was modified concurrently")]
    ConcurrentModification(Uuid),

    #[error("decide: ballot rejected: {0}")]
    BallotRejected(String),

    #[error("decide: unauthorized: {0}")]
    Unauthorized(String),

    #[error("decide: authority error: {0}")]
    Authority(String),

    #[error("decide: configuration error: {0}")]
    Config(String),

    #[error("decide: CBOR error deserializing: {0}")]
    CBORDeserialization(#[from] serde_cbor::Error),

    #[error("decide: JSON error deserializing: {0}")]
    JSONDeserialization(#[from] serde_json::Error),

    #[error("decide: error deserializing: unknown format")]
    DeserializationUnknownFormat,
}

impl Error {
    /// Sequencing errors: the caller asked for an illegal transition.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Error::Lifecycle(_))
    }

    /// Infrastructure failures. The voting was left untouched, so the same
    /// operation may be requested again.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Error::KeyAssemblyFailed(_)
                | Error::TallyFailed(_)
                | Error::TallyInProgress(_)
                | Error::DecryptionFailure(_)
                | Error::ConcurrentModification(_)
                | Error::Authority(_)
        )
    }
}
