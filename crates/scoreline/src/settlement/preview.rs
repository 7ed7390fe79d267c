use super::domain::{MatchResult, Prediction};
use super::evaluation::{ScoringEngine, Settlement};

/// The result under which `prediction` earns the most points: it comes true exactly.
pub fn best_case_result(prediction: &Prediction) -> MatchResult {
    let declared = |scorers: &[String], score: u16| {
        scorers
            .iter()
            .take(usize::from(score))
            .cloned()
            .collect::<Vec<_>>()
    };

    MatchResult {
        home_score: prediction.home_score,
        away_score: prediction.away_score,
        home_scorers: declared(&prediction.home_scorers, prediction.home_score),
        away_scorers: declared(&prediction.away_scorers, prediction.away_score),
    }
}

impl ScoringEngine {
    /// Maximum points the prediction can still earn, scored by the same rules as a real result.
    pub fn potential(&self, prediction: &Prediction) -> Settlement {
        self.settle(prediction, &best_case_result(prediction))
    }
}
