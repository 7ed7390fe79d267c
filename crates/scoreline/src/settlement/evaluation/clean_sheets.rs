use super::super::domain::{MatchResult, Prediction};

/// Number of correctly called clean sheets: 0, 1 or 2.
pub(crate) fn count_clean_sheets(prediction: &Prediction, result: &MatchResult) -> u8 {
    let home_kept = prediction.away_score == 0 && result.away_score == 0;
    let away_kept = prediction.home_score == 0 && result.home_score == 0;
    u8::from(home_kept) + u8::from(away_kept)
}
