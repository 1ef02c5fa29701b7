use crate::*;
use std::fmt;
use std::str::FromStr;

/// A requested lifecycle transition.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
    Tally,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Start, Action::Stop, Action::Tally];

    /// Message reported to the caller when the transition succeeds.
    pub fn success_message(&self) -> &'static str {
        match self {
            Action::Start => "Voting started",
            Action::Stop => "Voting stopped",
            Action::Tally => "Voting tallied",
        }
    }
}

impl FromStr for Action {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Action::Start),
            "stop" => Ok(Action::Stop),
            "tally" => Ok(Action::Tally),
            other => Err(LifecycleError::UnknownAction(other.to_owned())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Tally => "tally",
        };
        write!(f, "{}", name)
    }
}

/// Where a voting is in its life. Strictly linear, no state is ever skipped.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    NotStarted,
    Started,
    Stopped,
    Tallied,
}

impl LifecycleState {
    pub const ALL: [LifecycleState; 4] = [
        LifecycleState::NotStarted,
        LifecycleState::Started,
        LifecycleState::Stopped,
        LifecycleState::Tallied,
    ];

    /// Derive the state from the voting's lifecycle fields.
    pub fn of(voting: &Voting) -> Self {
        if voting.tally.is_some() {
            LifecycleState::Tallied
        } else if voting.end_time.is_some() {
            LifecycleState::Stopped
        } else if voting.start_time.is_some() {
            LifecycleState::Started
        } else {
            LifecycleState::NotStarted
        }
    }

    /// The state a successful `action` leads to.
    pub fn after(action: Action) -> Self {
        match action {
            Action::Start => LifecycleState::Started,
            Action::Stop => LifecycleState::Stopped,
            Action::Tally => LifecycleState::Tallied,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LifecycleState::NotStarted => "NOT_STARTED",
            LifecycleState::Started => "STARTED",
            LifecycleState::Stopped => "STOPPED",
            LifecycleState::Tallied => "TALLIED",
        };
        write!(f, "{}", name)
    }
}

/// Check whether `action` may be applied to `voting`.
///
/// A pure predicate over the lifecycle fields; nothing is changed.
pub fn check(voting: &Voting, action: Action) -> Result<(), LifecycleError> {
    match action {
        Action::Start => {
            if voting.start_time.is_some() {
                return Err(LifecycleError::AlreadyStarted);
            }
        }
        Action::Stop => {
            if voting.start_time.is_none() {
                return Err(LifecycleError::NotStarted);
            }
            if voting.end_time.is_some() {
                return Err(LifecycleError::AlreadyStopped);
            }
        }
        Action::Tally => {
            if voting.start_time.is_none() {
                return Err(LifecycleError::NotStarted);
            }
            if voting.end_time.is_none() {
                return Err(LifecycleError::NotStopped);
            }
            if voting.tally.is_some() {
                return Err(LifecycleError::AlreadyTallied);
            }
        }
    }
    Ok(())
}
