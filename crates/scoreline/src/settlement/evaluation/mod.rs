mod clean_sheets;
mod config;
mod modifiers;
mod outcome;
mod penalty;
mod scorers;

pub use config::{RuleOutOfRange, ScoringRules};
pub use outcome::OutcomeTier;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::chips::ChipCatalog;
use super::domain::{Chip, ChipSet, MatchResult, Prediction, Side};
use clean_sheets::count_clean_sheets;
use modifiers::apply_chips;
use outcome::classify;
use penalty::goal_mismatch_penalty;
use scorers::{declared_scorers, match_scorers};

/// Stateless settlement engine. Every surface that shows points goes through [`ScoringEngine::score`].
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rules: ScoringRules,
    catalog: ChipCatalog,
}

impl ScoringEngine {
    pub fn new(rules: ScoringRules) -> Self {
        let catalog = ChipCatalog::from_rules(&rules);
        Self { rules, catalog }
    }

    /// Engine configured with the published rulebook.
    pub fn standard() -> Self {
        Self::new(ScoringRules::default())
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn catalog(&self) -> &ChipCatalog {
        &self.catalog
    }

    /// Scores a prediction, or reports it pending while the result is absent.
    pub fn score(&self, prediction: &Prediction, result: Option<&MatchResult>) -> ScoringResult {
        match result {
            Some(result) => ScoringResult::Settled(self.settle(prediction, result)),
            None => ScoringResult::Pending,
        }
    }

    /// Scores a prediction against a known result.
    pub fn settle(&self, prediction: &Prediction, result: &MatchResult) -> Settlement {
        let rules = &self.rules;
        let mut flags = Vec::new();
        flag_unknown_chips(&prediction.chips, &mut flags);

        let predicted_home = declared_scorers(
            ScorerSource::Prediction,
            Side::Home,
            prediction.home_score,
            &prediction.home_scorers,
            &mut flags,
        );
        let predicted_away = declared_scorers(
            ScorerSource::Prediction,
            Side::Away,
            prediction.away_score,
            &prediction.away_scorers,
            &mut flags,
        );
        let actual_home = declared_scorers(
            ScorerSource::Result,
            Side::Home,
            result.home_score,
            &result.home_scorers,
            &mut flags,
        );
        let actual_away = declared_scorers(
            ScorerSource::Result,
            Side::Away,
            result.away_score,
            &result.away_scorers,
            &mut flags,
        );

        let scorers = match_scorers(predicted_home, predicted_away, actual_home, actual_away);
        let tier = classify(prediction, result, scorers.exact);

        let base = tier.points(rules);
        let mut breakdown = vec![BreakdownItem::new(
            tier.label(),
            base,
            BreakdownCategory::Base,
        )];
        let mut running = base;

        if scorers.correct_count > 0 {
            let per_scorer = if prediction.chips.contains(Chip::ScorerFocus) {
                rules.focused_scorer_points
            } else {
                rules.scorer_points
            };
            let matched = i32::try_from(scorers.correct_count).unwrap_or(i32::MAX);
            let bonus = per_scorer.saturating_mul(matched);
            breakdown.push(BreakdownItem::new(
                format!("{} correct scorer(s) x{per_scorer}", scorers.correct_count),
                bonus,
                BreakdownCategory::Bonus,
            ));
            running = running.saturating_add(bonus);
        }

        let penalty = goal_mismatch_penalty(
            prediction.total_goals(),
            result.total_goals(),
            rules.goal_tolerance,
        );
        if penalty > 0 {
            let penalty_points = i32::try_from(penalty).unwrap_or(i32::MAX);
            breakdown.push(BreakdownItem::new(
                format!(
                    "Total goals off by {}",
                    prediction.total_goals().abs_diff(result.total_goals())
                ),
                -penalty_points,
                BreakdownCategory::Penalty,
            ));
            running = running.saturating_sub(penalty_points);
        }

        let clean_sheets = count_clean_sheets(prediction, result);
        let total_points = apply_chips(
            running,
            &prediction.chips,
            clean_sheets,
            rules,
            &self.catalog,
            &mut breakdown,
        );

        debug!(
            tier = tier.label(),
            correct_scorers = scorers.correct_count,
            penalty,
            total_points,
            "prediction settled"
        );

        Settlement {
            total_points,
            tier,
            breakdown,
            flags,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn flag_unknown_chips(chips: &ChipSet, flags: &mut Vec<DataQualityFlag>) {
    for identifier in chips.unrecognized() {
        warn!(chip = identifier, "ignoring unknown chip identifier");
        flags.push(DataQualityFlag::UnknownChip {
            identifier: identifier.to_string(),
        });
    }
}

/// Result of scoring one prediction.
///
/// `Pending` is not a zero score: aggregations must leave it out of totals and averages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoringResult {
    Pending,
    Settled(Settlement),
}

impl ScoringResult {
    pub fn points(&self) -> Option<i32> {
        self.settlement().map(|settlement| settlement.total_points)
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            ScoringResult::Settled(settlement) => Some(settlement),
            ScoringResult::Pending => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ScoringResult::Pending)
    }
}

/// Points awarded for a settled prediction with the trail that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub total_points: i32,
    pub tier: OutcomeTier,
    /// Lines in the order they were applied. Values sum to `total_points`.
    pub breakdown: Vec<BreakdownItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<DataQualityFlag>,
}

impl Settlement {
    pub fn items(&self, category: BreakdownCategory) -> impl Iterator<Item = &BreakdownItem> + '_ {
        self.breakdown
            .iter()
            .filter(move |item| item.category == category)
    }
}

/// One itemized step of a settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub label: String,
    pub value: i32,
    pub category: BreakdownCategory,
}

impl BreakdownItem {
    pub(crate) fn new(label: impl Into<String>, value: i32, category: BreakdownCategory) -> Self {
        Self {
            label: label.into(),
            value,
            category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownCategory {
    Base,
    Bonus,
    Penalty,
    Multiplier,
}

/// Which record a scorer list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerSource {
    Prediction,
    Result,
}

impl ScorerSource {
    pub fn label(&self) -> &'static str {
        match self {
            ScorerSource::Prediction => "prediction",
            ScorerSource::Result => "result",
        }
    }
}

/// Inconsistencies the engine tolerated while scoring, surfaced for operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityFlag {
    UnknownChip {
        identifier: String,
    },
    ScorersTruncated {
        source: ScorerSource,
        side: Side,
        declared: u16,
        listed: usize,
    },
}
