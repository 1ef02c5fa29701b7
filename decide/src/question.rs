use crate::*;
use num_bigint::BigUint;
use std::collections::HashSet;
use std::convert::TryFrom;
use std::str::FromStr;
use uuid::Uuid;

/// Fixed labels of a yes/no question.
pub const YES_LABEL: &str = "Sí";
pub const NO_LABEL: &str = "No";

/// How ballots for a question are encoded and postprocessed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// One option per ballot, the plaintext is the option number.
    #[serde(rename = "DEFAULT")]
    Default,

    /// Like `Default`, restricted to the two fixed options.
    #[serde(rename = "YESNO")]
    YesNo,

    /// A full ordering of every option, encoded with `RankingCodec`.
    #[serde(rename = "RANKING")]
    Ranking,
}

impl Default for QuestionType {
    fn default() -> Self {
        QuestionType::Default
    }
}

impl FromStr for QuestionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEFAULT" => Ok(QuestionType::Default),
            "YESNO" => Ok(QuestionType::YesNo),
            "RANKING" => Ok(QuestionType::Ranking),
            other => Err(Error::InvalidQuestion(format!(
                "unknown question type {:?}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            QuestionType::Default => "DEFAULT",
            QuestionType::YesNo => "YESNO",
            QuestionType::Ranking => "RANKING",
        };
        write!(f, "{}", name)
    }
}

/// A selectable answer. `number` is what a ballot encrypts.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QuestionOption {
    pub number: u32,
    pub option: String,
}

/// A question together with its options.
///
/// Fields are private: a question can only be obtained through `new` or by
/// deserializing, and both paths check the option numbering.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct VotingQuestion {
    id: Uuid,
    description: String,
    question_type: QuestionType,
    options: Vec<QuestionOption>,
}

/// Unchecked wire form of `VotingQuestion`.
#[doc(hidden)]
#[derive(Serialize, Deserialize, Clone)]
pub struct QuestionRecord {
    id: Uuid,
    #[serde(default)]
    description: String,
    #[serde(default)]
    question_type: QuestionType,
    options: Vec<QuestionOption>,
}

impl VotingQuestion {
    /// Create a question, numbering the options `1..N` in the order given.
    ///
    /// The labels are ignored for yes/no questions, which always get
    /// `Sí` (1) and `No` (2).
    pub fn new<S: Into<String>>(
        description: S,
        question_type: QuestionType,
        labels: Vec<String>,
    ) -> Result<Self, Error> {
        let options = match question_type {
            QuestionType::YesNo => vec![
                QuestionOption {
                    number: 1,
                    option: YES_LABEL.to_owned(),
                },
                QuestionOption {
                    number: 2,
                    option: NO_LABEL.to_owned(),
                },
            ],
            _ => labels
                .into_iter()
                .enumerate()
                .map(|(i, option)| QuestionOption {
                    number: i as u32 + 1,
                    option,
                })
                .collect(),
        };

        VotingQuestion::try_from(QuestionRecord {
            id: Uuid::new_v4(),
            description: description.into(),
            question_type,
            options,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    /// Get an option by its number
    pub fn option(&self, number: u32) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.number == number)
    }

    /// The largest plaintext a valid ballot for this question can carry.
    ///
    /// The group modulus must exceed this for every ballot to be encryptable.
    pub fn max_plaintext(&self) -> BigUint {
        match self.question_type {
            QuestionType::Default | QuestionType::YesNo => {
                let max = self.options.iter().map(|o| o.number).max().unwrap_or(0);
                BigUint::from(max)
            }
            QuestionType::Ranking => RankingCodec::new(self.options.len()).max_encoded(),
        }
    }

    /// Encode a single-choice ballot plaintext.
    pub fn encode_choice(&self, number: u32) -> Result<BigUint, Error> {
        if self.question_type == QuestionType::Ranking {
            return Err(Error::InvalidPlaintext(
                "ranking questions take a full ranking, not a single choice".into(),
            ));
        }
        self.option(number)
            .map(|o| BigUint::from(o.number))
            .ok_or_else(|| Error::InvalidPlaintext(format!("option {} does not exist", number)))
    }

    /// Encode a ranking ballot plaintext, most preferred option first.
    pub fn encode_ranking(&self, ranking: &[u32]) -> Result<BigUint, Error> {
        if self.question_type != QuestionType::Ranking {
            return Err(Error::InvalidPlaintext(format!(
                "{} questions do not take rankings",
                self.question_type
            )));
        }
        RankingCodec::new(self.options.len()).encode(ranking)
    }
}

impl TryFrom<QuestionRecord> for VotingQuestion {
    type Error = Error;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let options = &record.options;

        let minimum = match record.question_type {
            QuestionType::Default => 1,
            QuestionType::YesNo | QuestionType::Ranking => 2,
        };
        if options.len() < minimum {
            return Err(Error::InvalidQuestion(format!(
                "{} question needs at least {} options, got {}",
                record.question_type,
                minimum,
                options.len()
            )));
        }

        // Numbers must be exactly 1..N, in any order
        let numbers: HashSet<u32> = options.iter().map(|o| o.number).collect();
        let expected: HashSet<u32> = (1..=options.len() as u32).collect();
        if numbers != expected {
            return Err(Error::InvalidQuestion(
                "option numbers must be 1..N without gaps or duplicates".into(),
            ));
        }

        if record.question_type == QuestionType::YesNo {
            let fixed = options
                .iter()
                .all(|o| match o.number {
                    1 => o.option == YES_LABEL,
                    2 => o.option == NO_LABEL,
                    _ => false,
                });
            if options.len() != 2 || !fixed {
                return Err(Error::InvalidQuestion(format!(
                    "YESNO question must have exactly the options {} and {}",
                    YES_LABEL, NO_LABEL
                )));
            }
        }

        let mut options = record.options;
        options.sort_by_key(|o| o.number);

        Ok(VotingQuestion {
            id: record.id,
            description: record.description,
            question_type: record.question_type,
            options,
        })
    }
}

impl From<VotingQuestion> for QuestionRecord {
    fn from(question: VotingQuestion) -> Self {
        QuestionRecord {
            id: question.id,
            description: question.description,
            question_type: question.question_type,
            options: question.options,
        }
    }
}

impl std::fmt::Display for VotingQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}
