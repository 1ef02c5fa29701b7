use decide::QuestionType;
use serde::{Deserialize, Serialize};

/// A voting to run end to end: its question, its authorities and the ballots
/// cast in it.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Scenario {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub question: ScenarioQuestion,
    pub authorities: Vec<ScenarioAuthority>,
    pub ballots: Vec<ScenarioBallot>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScenarioQuestion {
    pub description: String,

    #[serde(default)]
    pub question_type: QuestionType,

    /// Option labels, numbered from 1 in this order. Ignored for YESNO.
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScenarioAuthority {
    pub name: String,

    /// Base URL of a remote authority. Without one the authority runs in
    /// this process.
    #[serde(default)]
    pub url: Option<String>,
}

/// A single choice or a full ranking.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ScenarioBallot {
    Choice(u32),
    Ranking(Vec<u32>),
}

impl Scenario {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, decide::Error> {
        decide::from_json_or_cbor(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json() {
        let json = br#"{
            "name": "pets",
            "question": {
                "description": "Best pet",
                "question_type": "RANKING",
                "options": ["cat", "dog", "fish"]
            },
            "authorities": [{"name": "local"}, {"name": "remote", "url": "http://localhost:8000"}],
            "ballots": [[1, 2, 3], [2, 3, 1]]
        }"#;
        let scenario = Scenario::from_bytes(json).unwrap();
        assert_eq!(scenario.question.question_type, QuestionType::Ranking);
        assert!(scenario.authorities[0].url.is_none());
        assert_eq!(scenario.ballots[1], ScenarioBallot::Ranking(vec![2, 3, 1]));
        assert_eq!(scenario.description, "");
    }

    #[test]
    fn parse_cbor() {
        let scenario = Scenario {
            name: "yes or no".into(),
            description: String::new(),
            question: ScenarioQuestion {
                description: "Agree?".into(),
                question_type: QuestionType::YesNo,
                options: vec![],
            },
            authorities: vec![ScenarioAuthority {
                name: "a".into(),
                url: None,
            }],
            ballots: vec![ScenarioBallot::Choice(1), ScenarioBallot::Choice(2)],
        };
        let bytes = serde_cbor::to_vec(&scenario).unwrap();
        let parsed = Scenario::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.ballots, scenario.ballots);
        assert_eq!(parsed.question.question_type, QuestionType::YesNo);
    }
}
