use serde::{Deserialize, Serialize};

use super::super::domain::{MatchResult, Prediction};
use super::config::ScoringRules;

/// Base-points bracket for how well the scoreline was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    Perfect,
    ExactScore,
    CorrectDraw,
    CorrectWinner,
    NoMatch,
}

impl OutcomeTier {
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeTier::Perfect => "Perfect prediction",
            OutcomeTier::ExactScore => "Exact score",
            OutcomeTier::CorrectDraw => "Correct draw",
            OutcomeTier::CorrectWinner => "Correct winner",
            OutcomeTier::NoMatch => "Incorrect result",
        }
    }

    pub fn points(&self, rules: &ScoringRules) -> i32 {
        match self {
            OutcomeTier::Perfect => rules.perfect_points,
            OutcomeTier::ExactScore => rules.exact_score_points,
            OutcomeTier::CorrectDraw => rules.correct_draw_points,
            OutcomeTier::CorrectWinner => rules.correct_winner_points,
            OutcomeTier::NoMatch => 0,
        }
    }
}

/// First matching tier wins; the order of the checks is part of the rules.
pub(crate) fn classify(
    prediction: &Prediction,
    result: &MatchResult,
    scorers_exact: bool,
) -> OutcomeTier {
    let exact_scoreline =
        prediction.home_score == result.home_score && prediction.away_score == result.away_score;

    if exact_scoreline && scorers_exact {
        return OutcomeTier::Perfect;
    }

    if exact_scoreline {
        return OutcomeTier::ExactScore;
    }

    if result.home_score == result.away_score && prediction.home_score == prediction.away_score {
        return OutcomeTier::CorrectDraw;
    }

    if prediction.home_score.cmp(&prediction.away_score)
        == result.home_score.cmp(&result.away_score)
    {
        return OutcomeTier::CorrectWinner;
    }

    OutcomeTier::NoMatch
}
