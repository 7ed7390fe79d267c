//! Prediction settlement for football fixtures.
//!
//! [`settlement::ScoringEngine`] is the single place where a prediction is turned into points.
//! The service, router, leaderboard and preview surfaces all call into it.

pub mod config;
pub mod error;
pub mod settlement;
pub mod telemetry;
