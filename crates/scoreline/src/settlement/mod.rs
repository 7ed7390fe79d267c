//! Prediction intake, settlement, and standings.
//!
//! [`ScoringEngine`] turns a prediction and an optional full-time result into points. Every
//! other surface here (the service, the router, the leaderboard and the potential-points
//! preview) delegates to it rather than re-deriving the arithmetic.

pub mod chips;
pub mod domain;
pub mod evaluation;
pub mod leaderboard;
pub mod preview;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use chips::{
    AllowAllChips, ChipCatalog, ChipCommand, ChipContext, ChipDefinition, ChipEffect,
    ChipEligibility, ChipRejection,
};
pub use domain::{
    Chip, ChipSet, FixtureId, InvalidPredictionData, MatchResult, Prediction, PredictionKey,
    PredictionRecord, PredictionSubmission, ResultRecord, Side, UnrecognizedChip, UserId,
};
pub use evaluation::{
    BreakdownCategory, BreakdownItem, DataQualityFlag, OutcomeTier, RuleOutOfRange, ScorerSource,
    ScoringEngine, ScoringResult, ScoringRules, Settlement,
};
pub use leaderboard::{settle_batch, ScoringInput, Standings, StandingsRow};
pub use preview::best_case_result;
pub use repository::{RepositoryError, SettlementRepository};
pub use router::settlement_router;
pub use service::{SettlementService, SettlementServiceError};
