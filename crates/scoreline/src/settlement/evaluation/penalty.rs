/// Points lost when total goals miss by more than the tolerance; zero otherwise.
pub(crate) fn goal_mismatch_penalty(predicted_goals: u32, actual_goals: u32, tolerance: u32) -> u32 {
    predicted_goals.abs_diff(actual_goals).saturating_sub(tolerance)
}
