use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Chip, ChipSet, FixtureId, UserId};
use super::evaluation::ScoringRules;

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// What a chip does to a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ChipEffect {
    Multiplier(i32),
    ScorerBonusPerMatch(i32),
    CleanSheetBonus(i32),
    /// Changes when a prediction may be submitted; no scoring effect.
    SubmissionTiming,
}

/// Static metadata for one chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChipDefinition {
    pub chip: Chip,
    pub name: &'static str,
    pub description: &'static str,
    pub effect: ChipEffect,
    pub season_limit: u8,
    pub cooldown_gameweeks: u8,
}

/// The one table of chip metadata. Effect values come from the scoring rules so the two never drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipCatalog {
    definitions: [ChipDefinition; 6],
}

impl ChipCatalog {
    pub fn standard() -> Self {
        Self::from_rules(&ScoringRules::default())
    }

    pub fn from_rules(rules: &ScoringRules) -> Self {
        Self {
            definitions: Chip::ordered().map(|chip| define(chip, rules)),
        }
    }

    pub fn definition(&self, chip: Chip) -> &ChipDefinition {
        // `Chip::ordered()` follows declaration order, so the discriminant is the slot.
        &self.definitions[chip as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChipDefinition> + '_ {
        self.definitions.iter()
    }
}

impl Default for ChipCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn define(chip: Chip, rules: &ScoringRules) -> ChipDefinition {
    match chip {
        Chip::Wildcard => ChipDefinition {
            chip,
            name: "Wildcard",
            description: "Triples the points for this prediction.",
            effect: ChipEffect::Multiplier(rules.wildcard_multiplier),
            season_limit: 1,
            cooldown_gameweeks: 0,
        },
        Chip::DoubleDown => ChipDefinition {
            chip,
            name: "Double Down",
            description: "Doubles the points for this prediction.",
            effect: ChipEffect::Multiplier(rules.double_down_multiplier),
            season_limit: 3,
            cooldown_gameweeks: 2,
        },
        Chip::AllInWeek => ChipDefinition {
            chip,
            name: "All-In Week",
            description: "Doubles the points for every prediction in the gameweek.",
            effect: ChipEffect::Multiplier(rules.all_in_week_multiplier),
            season_limit: 1,
            cooldown_gameweeks: 0,
        },
        Chip::ScorerFocus => ChipDefinition {
            chip,
            name: "Scorer Focus",
            description: "Doubles the points earned per correct goalscorer.",
            effect: ChipEffect::ScorerBonusPerMatch(rules.focused_scorer_points),
            season_limit: 3,
            cooldown_gameweeks: 2,
        },
        Chip::DefensePlusPlus => ChipDefinition {
            chip,
            name: "Defense++",
            description: "Adds a flat bonus for each correctly predicted clean sheet.",
            effect: ChipEffect::CleanSheetBonus(rules.clean_sheet_bonus),
            season_limit: 3,
            cooldown_gameweeks: 2,
        },
        Chip::Opportunist => ChipDefinition {
            chip,
            name: "Opportunist",
            description: "Allows a late change to the prediction.",
            effect: ChipEffect::SubmissionTiming,
            season_limit: 2,
            cooldown_gameweeks: 3,
        },
    }
}

/// Request to change the chips on a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "chip", rename_all = "snake_case")]
pub enum ChipCommand {
    Apply(Chip),
    Remove(Chip),
}

/// Whose prediction a chip command targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipContext {
    pub user_id: UserId,
    pub fixture_id: FixtureId,
}

/// Season-limit and cooldown policy owned outside the settlement engine.
pub trait ChipEligibility: Send + Sync {
    fn check(&self, chip: &ChipDefinition, context: &ChipContext) -> Result<(), ChipRejection>;
}

/// Policy that accepts every chip.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllChips;

impl ChipEligibility for AllowAllChips {
    fn check(&self, _chip: &ChipDefinition, _context: &ChipContext) -> Result<(), ChipRejection> {
        Ok(())
    }
}

/// Reason the eligibility policy refused a chip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChipRejection {
    #[error("{chip} already used {limit} time(s) this season")]
    SeasonLimitReached { chip: Chip, limit: u8 },
    #[error("{chip} is cooling down for {remaining} more gameweek(s)")]
    CoolingDown { chip: Chip, remaining: u8 },
    #[error("{chip} rejected: {reason}")]
    NotAllowed { chip: Chip, reason: String },
}

impl ChipSet {
    /// Returns the chip set after `command`, asking the policy before any chip is added.
    pub fn apply(
        self,
        command: ChipCommand,
        catalog: &ChipCatalog,
        policy: &dyn ChipEligibility,
        context: &ChipContext,
    ) -> Result<ChipSet, ChipRejection> {
        match command {
            ChipCommand::Apply(chip) if self.contains(chip) => Ok(self),
            ChipCommand::Apply(chip) => {
                policy.check(catalog.definition(chip), context)?;
                debug!(
                    %chip,
                    user = %context.user_id,
                    fixture = %context.fixture_id,
                    "chip applied"
                );
                Ok(self.with(chip))
            }
            ChipCommand::Remove(chip) => Ok(self.without(chip)),
        }
    }
}
