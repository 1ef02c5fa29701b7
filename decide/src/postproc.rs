use crate::*;
use indexmap::IndexMap;
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use std::collections::HashSet;
use tallystick::borda::{DefaultBordaTally, Variant};
use tallystick::plurality::DefaultPluralityTally;

/// Fixed-width decimal encoding of a full ranking of `1..N`.
///
/// Every option number is zero-padded to the number of decimal digits in `N`
/// and the padded numbers are concatenated, most preferred first. For `N <= 9`
/// this is plain digit concatenation: `[2, 3, 1]` encodes as `231`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankingCodec {
    options: usize,
    width: usize,
}

impl RankingCodec {
    pub fn new(options: usize) -> Self {
        RankingCodec {
            options,
            width: options.to_string().len(),
        }
    }

    /// Number of options being ranked
    pub fn options(&self) -> usize {
        self.options
    }

    /// Decimal digits used for each option number
    pub fn width(&self) -> usize {
        self.width
    }

    /// Encode a ranking. It must be a permutation of `1..N`.
    pub fn encode(&self, ranking: &[u32]) -> Result<BigUint, Error> {
        if !self.is_permutation(ranking) {
            return Err(Error::InvalidPlaintext(format!(
                "ranking {:?} is not a permutation of 1..{}",
                ranking, self.options
            )));
        }

        let digits: String = ranking
            .iter()
            .map(|n| format!("{:0width$}", n, width = self.width))
            .collect();

        digits
            .parse::<BigUint>()
            .map_err(|e| Error::InvalidPlaintext(e.to_string()))
    }

    /// Decode an integer back into a ranking, or `None` if it doesn't encode
    /// a permutation of `1..N`.
    pub fn decode(&self, value: &BigUint) -> Option<Vec<u32>> {
        let total = self.options * self.width;
        let digits = value.to_str_radix(10);
        if self.options == 0 || digits.len() > total {
            return None;
        }
        let padded = format!("{:0>total$}", digits, total = total);

        let ranking: Vec<u32> = padded
            .as_bytes()
            .chunks(self.width)
            .map(|chunk| std::str::from_utf8(chunk).ok()?.parse::<u32>().ok())
            .collect::<Option<_>>()?;

        if self.is_permutation(&ranking) {
            Some(ranking)
        } else {
            None
        }
    }

    /// The largest value any ranking can encode to: options in descending order.
    pub fn max_encoded(&self) -> BigUint {
        let descending: Vec<u32> = (1..=self.options as u32).rev().collect();
        self.encode(&descending).unwrap_or_default()
    }

    fn is_permutation(&self, ranking: &[u32]) -> bool {
        if ranking.len() != self.options {
            return false;
        }
        let mut seen = HashSet::with_capacity(ranking.len());
        ranking
            .iter()
            .all(|&n| n >= 1 && n as usize <= self.options && seen.insert(n))
    }
}

/// Result for one option of a single-choice question.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OptionResult {
    pub number: u32,
    pub option: String,
    pub votes: u64,
    pub postproc: u64,
}

/// Result for one option of a ranking question.
///
/// `score` is the Borda total, `postproc` the final 1-based rank.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RankedOptionResult {
    pub number: u32,
    pub option: String,
    pub score: u64,
    pub postproc: u64,
}

/// How many ballots carried a given ranking.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PermutationCount {
    pub ranking: Vec<u32>,

    #[serde(with = "BigUintHex")]
    pub encoded: BigUint,

    pub votes: u64,
}

/// Final, human-meaningful results of a tallied voting.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PostProc {
    Counted {
        options: Vec<OptionResult>,
    },
    Ranked {
        options: Vec<RankedOptionResult>,
        permutations: Vec<PermutationCount>,
    },
}

impl PostProc {
    /// Turn a tally of decrypted plaintexts into per-option results.
    ///
    /// Any plaintext that is not a valid ballot for the question aborts the
    /// whole computation.
    pub fn compute(question: &VotingQuestion, tally: &[BigUint]) -> Result<Self, Error> {
        match question.question_type() {
            QuestionType::Default | QuestionType::YesNo => count(question, tally),
            QuestionType::Ranking => rank(question, tally),
        }
    }

    /// Option numbers from best to worst
    pub fn order(&self) -> Vec<u32> {
        match self {
            PostProc::Counted { options } => options.iter().map(|o| o.number).collect(),
            PostProc::Ranked { options, .. } => options.iter().map(|o| o.number).collect(),
        }
    }
}

fn count(question: &VotingQuestion, tally: &[BigUint]) -> Result<PostProc, Error> {
    let mut plurality = DefaultPluralityTally::new(1);
    for (index, plaintext) in tally.iter().enumerate() {
        let number = plaintext
            .to_u32()
            .filter(|n| question.option(*n).is_some())
            .ok_or(Error::PlaintextOutOfRange { index })?;
        plurality.add(number);
    }
    let totals = totals_by_option(plurality.totals());

    let mut options: Vec<OptionResult> = question
        .options()
        .iter()
        .map(|o| {
            let votes = totals.get(&o.number).copied().unwrap_or(0);
            OptionResult {
                number: o.number,
                option: o.option.clone(),
                votes,
                postproc: votes,
            }
        })
        .collect();
    options.sort_by(|x, y| y.votes.cmp(&x.votes).then(x.number.cmp(&y.number)));

    Ok(PostProc::Counted { options })
}

fn rank(question: &VotingQuestion, tally: &[BigUint]) -> Result<PostProc, Error> {
    let n = question.options().len();
    let codec = RankingCodec::new(n);

    // Distinct rankings in order of first appearance
    let mut counts: IndexMap<&BigUint, (Vec<u32>, u64)> = IndexMap::new();
    let mut borda = DefaultBordaTally::new(1, Variant::ClassicBorda);
    for (index, plaintext) in tally.iter().enumerate() {
        let ranking = match counts.get_mut(plaintext) {
            Some(entry) => {
                entry.1 += 1;
                entry.0.clone()
            }
            None => {
                let ranking = codec
                    .decode(plaintext)
                    .ok_or(Error::InvalidRankingBallot { index, options: n })?;
                counts.insert(plaintext, (ranking.clone(), 1));
                ranking
            }
        };
        // Every ballot is a full permutation, so the first place earns n points
        let _ = borda.add(ranking);
    }
    let scores = totals_by_option(borda.totals());

    let mut options: Vec<RankedOptionResult> = question
        .options()
        .iter()
        .map(|o| RankedOptionResult {
            number: o.number,
            option: o.option.clone(),
            score: scores.get(&o.number).copied().unwrap_or(0),
            postproc: 0,
        })
        .collect();
    options.sort_by(|x, y| y.score.cmp(&x.score).then(x.number.cmp(&y.number)));
    for (rank, option) in options.iter_mut().enumerate() {
        option.postproc = rank as u64 + 1;
    }

    let mut permutations: Vec<PermutationCount> = counts
        .into_iter()
        .map(|(encoded, (ranking, votes))| PermutationCount {
            ranking,
            encoded: encoded.clone(),
            votes,
        })
        .collect();
    permutations.sort_by(|x, y| y.votes.cmp(&x.votes).then(x.encoded.cmp(&y.encoded)));

    Ok(PostProc::Ranked {
        options,
        permutations,
    })
}

/// Collapse tallystick totals into whole-number scores keyed by option number.
fn totals_by_option<C: ToPrimitive>(totals: Vec<(u32, C)>) -> IndexMap<u32, u64> {
    totals
        .into_iter()
        .map(|(number, total)| (number, total.to_u64().unwrap_or(0)))
        .collect()
}
