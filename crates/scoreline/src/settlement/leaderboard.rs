use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::domain::{MatchResult, Prediction, PredictionKey, UserId};
use super::evaluation::{ScoringEngine, ScoringResult};

/// One prediction with whatever result is known for its fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringInput {
    pub key: PredictionKey,
    pub prediction: Prediction,
    pub result: Option<MatchResult>,
}

/// Scores every input in parallel. Output order matches input order.
pub fn settle_batch(engine: &ScoringEngine, inputs: &[ScoringInput]) -> Vec<ScoringResult> {
    inputs
        .par_iter()
        .map(|input| engine.score(&input.prediction, input.result.as_ref()))
        .collect()
}

/// Per-user totals. Pending predictions are counted but add no points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub user_id: UserId,
    pub points: i64,
    pub settled: usize,
    pub pending: usize,
}

impl StandingsRow {
    /// Mean points over settled predictions only.
    pub fn average(&self) -> Option<f64> {
        if self.settled == 0 {
            None
        } else {
            Some(self.points as f64 / self.settled as f64)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    pub rows: Vec<StandingsRow>,
}

impl Standings {
    /// Ordered by points descending, then user id.
    pub fn from_results<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a UserId, &'a ScoringResult)>,
    {
        let mut by_user: BTreeMap<&UserId, StandingsRow> = BTreeMap::new();
        for (user_id, result) in entries {
            let row = by_user.entry(user_id).or_insert_with(|| StandingsRow {
                user_id: user_id.clone(),
                points: 0,
                settled: 0,
                pending: 0,
            });
            match result.points() {
                Some(points) => {
                    row.points += i64::from(points);
                    row.settled += 1;
                }
                None => row.pending += 1,
            }
        }

        let mut rows: Vec<StandingsRow> = by_user.into_values().collect();
        rows.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Self { rows }
    }

    pub fn settle(engine: &ScoringEngine, inputs: &[ScoringInput]) -> Self {
        let results = settle_batch(engine, inputs);
        Self::from_results(
            inputs
                .iter()
                .map(|input| &input.key.user_id)
                .zip(results.iter()),
        )
    }

    pub fn row(&self, user_id: &UserId) -> Option<&StandingsRow> {
        self.rows.iter().find(|row| &row.user_id == user_id)
    }
}
