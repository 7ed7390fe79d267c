use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for the predicting user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for a fixture supplied by the results feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FixtureId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user holds at most one prediction per fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredictionKey {
    pub user_id: UserId,
    pub fixture_id: FixtureId,
}

impl fmt::Display for PredictionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.fixture_id)
    }
}

/// Scoring chips a user can attach to a prediction.
///
/// Deserialization goes through [`Chip::from_identifier`], the same lenient parse chip sets use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Chip {
    Wildcard,
    DoubleDown,
    AllInWeek,
    ScorerFocus,
    DefensePlusPlus,
    Opportunist,
}

impl Chip {
    pub fn ordered() -> [Chip; 6] {
        [
            Chip::Wildcard,
            Chip::DoubleDown,
            Chip::AllInWeek,
            Chip::ScorerFocus,
            Chip::DefensePlusPlus,
            Chip::Opportunist,
        ]
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Chip::Wildcard => "wildcard",
            Chip::DoubleDown => "double_down",
            Chip::AllInWeek => "all_in_week",
            Chip::ScorerFocus => "scorer_focus",
            Chip::DefensePlusPlus => "defense_plus_plus",
            Chip::Opportunist => "opportunist",
        }
    }

    pub fn from_identifier(raw: &str) -> Option<Self> {
        let needle = raw.trim();
        Self::ordered()
            .into_iter()
            .find(|chip| chip.identifier().eq_ignore_ascii_case(needle))
    }
}

impl TryFrom<String> for Chip {
    type Error = UnrecognizedChip;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Chip::from_identifier(&raw).ok_or(UnrecognizedChip(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized chip identifier '{0}'")]
pub struct UnrecognizedChip(pub String);

/// Chips attached to a prediction.
///
/// Built from identifier strings at the boundary. Identifiers that do not name a known chip are
/// kept aside in `unrecognized` so the engine can flag them; they never change the score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ChipSet {
    chips: BTreeSet<Chip>,
    unrecognized: BTreeSet<String>,
}

impl ChipSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, chip: Chip) -> bool {
        self.chips.contains(&chip)
    }

    pub fn iter(&self) -> impl Iterator<Item = Chip> + '_ {
        self.chips.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = &str> {
        self.unrecognized.iter().map(String::as_str)
    }

    pub(crate) fn with(mut self, chip: Chip) -> Self {
        self.chips.insert(chip);
        self
    }

    pub(crate) fn without(mut self, chip: Chip) -> Self {
        self.chips.remove(&chip);
        self
    }
}

impl FromIterator<Chip> for ChipSet {
    fn from_iter<I: IntoIterator<Item = Chip>>(iter: I) -> Self {
        Self {
            chips: iter.into_iter().collect(),
            unrecognized: BTreeSet::new(),
        }
    }
}

impl From<Vec<String>> for ChipSet {
    fn from(identifiers: Vec<String>) -> Self {
        let mut set = ChipSet::default();
        for raw in identifiers {
            match Chip::from_identifier(&raw) {
                Some(chip) => {
                    set.chips.insert(chip);
                }
                None => {
                    set.unrecognized.insert(raw);
                }
            }
        }
        set
    }
}

impl From<ChipSet> for Vec<String> {
    fn from(set: ChipSet) -> Self {
        set.chips
            .iter()
            .map(|chip| chip.identifier().to_string())
            .chain(set.unrecognized)
            .collect()
    }
}

/// A user's predicted scoreline, goalscorers and chips for one fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_score: u16,
    pub away_score: u16,
    #[serde(default)]
    pub home_scorers: Vec<String>,
    #[serde(default)]
    pub away_scorers: Vec<String>,
    #[serde(default)]
    pub chips: ChipSet,
}

impl Prediction {
    /// Checks that each scorer list is exactly as long as the declared score.
    pub fn validate(&self) -> Result<(), InvalidPredictionData> {
        check_scorers(Side::Home, self.home_score, &self.home_scorers)?;
        check_scorers(Side::Away, self.away_score, &self.away_scorers)
    }

    pub fn total_goals(&self) -> u32 {
        u32::from(self.home_score) + u32::from(self.away_score)
    }
}

/// Full-time result published by the results feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub home_score: u16,
    pub away_score: u16,
    #[serde(default)]
    pub home_scorers: Vec<String>,
    #[serde(default)]
    pub away_scorers: Vec<String>,
}

impl MatchResult {
    pub fn validate(&self) -> Result<(), InvalidPredictionData> {
        check_scorers(Side::Home, self.home_score, &self.home_scorers)?;
        check_scorers(Side::Away, self.away_score, &self.away_scorers)
    }

    pub fn total_goals(&self) -> u32 {
        u32::from(self.home_score) + u32::from(self.away_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

/// Scorer list length disagrees with the declared score.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} scorers list has {listed} entries but the declared score is {declared}", .side.label())]
pub struct InvalidPredictionData {
    pub side: Side,
    pub declared: u16,
    pub listed: usize,
}

fn check_scorers(
    side: Side,
    declared: u16,
    scorers: &[String],
) -> Result<(), InvalidPredictionData> {
    if scorers.len() == usize::from(declared) {
        Ok(())
    } else {
        Err(InvalidPredictionData {
            side,
            declared,
            listed: scorers.len(),
        })
    }
}

/// What a user sends when creating or replacing a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionSubmission {
    pub user_id: UserId,
    pub fixture_id: FixtureId,
    pub prediction: Prediction,
}

impl PredictionSubmission {
    pub fn key(&self) -> PredictionKey {
        PredictionKey {
            user_id: self.user_id.clone(),
            fixture_id: self.fixture_id.clone(),
        }
    }
}

/// Stored prediction; replaced wholesale on resubmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub key: PredictionKey,
    pub prediction: Prediction,
    pub submitted_at: DateTime<Utc>,
}

/// Stored full-time result for a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub fixture_id: FixtureId,
    pub result: MatchResult,
    pub recorded_at: DateTime<Utc>,
}
