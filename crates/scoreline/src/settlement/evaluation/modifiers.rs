use super::super::chips::ChipCatalog;
use super::super::domain::{Chip, ChipSet};
use super::config::ScoringRules;
use super::{BreakdownCategory, BreakdownItem};

/// Multiplier chips in the order they are applied.
const MULTIPLIER_ORDER: [Chip; 3] = [Chip::Wildcard, Chip::DoubleDown, Chip::AllInWeek];

/// Applies chip effects to the post-penalty running total and returns the final total.
///
/// Multipliers compound on each other. The clean-sheet bonus is added after every multiplier
/// and is never scaled.
pub(crate) fn apply_chips(
    running: i32,
    chips: &ChipSet,
    clean_sheets: u8,
    rules: &ScoringRules,
    catalog: &ChipCatalog,
    breakdown: &mut Vec<BreakdownItem>,
) -> i32 {
    let mut total = running;

    for chip in MULTIPLIER_ORDER {
        if !chips.contains(chip) {
            continue;
        }
        let factor = multiplier_for(chip, rules);
        let scaled = total.saturating_mul(factor);
        breakdown.push(BreakdownItem::new(
            format!("{} (x{factor})", catalog.definition(chip).name),
            scaled.saturating_sub(total),
            BreakdownCategory::Multiplier,
        ));
        total = scaled;
    }

    if chips.contains(Chip::DefensePlusPlus) {
        let bonus = rules.clean_sheet_bonus.saturating_mul(i32::from(clean_sheets));
        breakdown.push(BreakdownItem::new(
            format!(
                "{}: {clean_sheets} clean sheet(s)",
                catalog.definition(Chip::DefensePlusPlus).name
            ),
            bonus,
            BreakdownCategory::Bonus,
        ));
        total = total.saturating_add(bonus);
    }

    total
}

fn multiplier_for(chip: Chip, rules: &ScoringRules) -> i32 {
    match chip {
        Chip::Wildcard => rules.wildcard_multiplier,
        Chip::DoubleDown => rules.double_down_multiplier,
        Chip::AllInWeek => rules.all_in_week_multiplier,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(running: i32, chips: &[Chip], clean_sheets: u8) -> (i32, Vec<BreakdownItem>) {
        let rules = ScoringRules::default();
        let catalog = ChipCatalog::from_rules(&rules);
        let set: ChipSet = chips.iter().copied().collect();
        let mut breakdown = Vec::new();
        let total = apply_chips(running, &set, clean_sheets, &rules, &catalog, &mut breakdown);
        (total, breakdown)
    }

    #[test]
    fn all_multipliers_compound_to_twelve() {
        let (total, breakdown) = run(5, &[Chip::AllInWeek, Chip::DoubleDown, Chip::Wildcard], 0);
        assert_eq!(total, 60);
        let deltas: Vec<i32> = breakdown.iter().map(|item| item.value).collect();
        assert_eq!(deltas, vec![10, 15, 30]);
        assert!(breakdown[0].label.starts_with("Wildcard"));
        assert!(breakdown[2].label.starts_with("All-In Week"));
    }

    #[test]
    fn clean_sheet_bonus_is_never_multiplied() {
        let (total, breakdown) = run(10, &[Chip::DefensePlusPlus, Chip::Wildcard], 2);
        assert_eq!(total, 40);
        let last = breakdown.last().expect("clean sheet line");
        assert_eq!(last.category, BreakdownCategory::Bonus);
        assert_eq!(last.value, 10);
    }

    #[test]
    fn defense_chip_is_listed_even_without_clean_sheets() {
        let (total, breakdown) = run(7, &[Chip::DefensePlusPlus], 0);
        assert_eq!(total, 7);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].value, 0);
    }

    #[test]
    fn negative_totals_are_scaled_not_clamped() {
        let (total, _) = run(-3, &[Chip::DoubleDown], 0);
        assert_eq!(total, -6);
    }

    #[test]
    fn oversized_factors_saturate_instead_of_overflowing() {
        let rules = ScoringRules {
            wildcard_multiplier: 200_000_000,
            ..ScoringRules::default()
        };
        let catalog = ChipCatalog::from_rules(&rules);
        let set: ChipSet = [Chip::Wildcard, Chip::DoubleDown].into_iter().collect();
        let mut breakdown = Vec::new();

        let total = apply_chips(15, &set, 0, &rules, &catalog, &mut breakdown);

        assert_eq!(total, i32::MAX);
    }

    #[test]
    fn inert_chips_leave_the_total_untouched() {
        let (total, breakdown) = run(9, &[Chip::Opportunist, Chip::ScorerFocus], 2);
        assert_eq!(total, 9);
        assert!(breakdown.is_empty());
    }
}
