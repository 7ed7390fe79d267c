use serde::{Deserialize, Serialize};

/// Point values and chip factors used by the settlement engine.
///
/// `Default` is the published rulebook. Override files only need the fields they change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub perfect_points: i32,
    pub exact_score_points: i32,
    pub correct_draw_points: i32,
    pub correct_winner_points: i32,
    pub scorer_points: i32,
    pub focused_scorer_points: i32,
    pub goal_tolerance: u32,
    pub wildcard_multiplier: i32,
    pub double_down_multiplier: i32,
    pub all_in_week_multiplier: i32,
    pub clean_sheet_bonus: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            perfect_points: 15,
            exact_score_points: 10,
            correct_draw_points: 7,
            correct_winner_points: 5,
            scorer_points: 2,
            focused_scorer_points: 4,
            goal_tolerance: 2,
            wildcard_multiplier: 3,
            double_down_multiplier: 2,
            all_in_week_multiplier: 2,
            clean_sheet_bonus: 5,
        }
    }
}

/// Bounds an override file must stay within.
const POINTS_RANGE: (i64, i64) = (0, 1_000);
const MULTIPLIER_RANGE: (i64, i64) = (1, 10);
const TOLERANCE_RANGE: (i64, i64) = (0, 20);

impl ScoringRules {
    /// Rejects values outside the ranges the rulebook allows.
    pub fn validate(&self) -> Result<(), RuleOutOfRange> {
        let points = [
            ("perfect_points", self.perfect_points),
            ("exact_score_points", self.exact_score_points),
            ("correct_draw_points", self.correct_draw_points),
            ("correct_winner_points", self.correct_winner_points),
            ("scorer_points", self.scorer_points),
            ("focused_scorer_points", self.focused_scorer_points),
            ("clean_sheet_bonus", self.clean_sheet_bonus),
        ];
        let multipliers = [
            ("wildcard_multiplier", self.wildcard_multiplier),
            ("double_down_multiplier", self.double_down_multiplier),
            ("all_in_week_multiplier", self.all_in_week_multiplier),
        ];

        for (field, value) in points {
            check_range(field, i64::from(value), POINTS_RANGE)?;
        }
        for (field, value) in multipliers {
            check_range(field, i64::from(value), MULTIPLIER_RANGE)?;
        }
        check_range("goal_tolerance", i64::from(self.goal_tolerance), TOLERANCE_RANGE)
    }
}

fn check_range(field: &'static str, value: i64, (min, max): (i64, i64)) -> Result<(), RuleOutOfRange> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RuleOutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// A scoring rule value outside its allowed range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} = {value} is outside {min}..={max}")]
pub struct RuleOutOfRange {
    pub field: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}
