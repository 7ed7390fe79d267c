use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::chips::{ChipCommand, ChipContext, ChipEligibility, ChipRejection};
use super::domain::{
    FixtureId, InvalidPredictionData, MatchResult, PredictionKey, PredictionRecord,
    PredictionSubmission, ResultRecord,
};
use super::evaluation::{ScoringEngine, ScoringResult, Settlement};
use super::leaderboard::{ScoringInput, Standings};
use super::repository::{RepositoryError, SettlementRepository};

/// Service composing the repository, chip policy, and scoring engine.
///
/// Scores are recomputed on every read; nothing derived from the engine is stored.
pub struct SettlementService<R, P> {
    repository: Arc<R>,
    policy: Arc<P>,
    engine: Arc<ScoringEngine>,
}

impl<R, P> SettlementService<R, P>
where
    R: SettlementRepository + 'static,
    P: ChipEligibility + 'static,
{
    pub fn new(repository: Arc<R>, policy: Arc<P>, engine: ScoringEngine) -> Self {
        Self {
            repository,
            policy,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Store a new prediction or replace the user's existing one for the fixture.
    pub fn submit(
        &self,
        submission: PredictionSubmission,
    ) -> Result<PredictionRecord, SettlementServiceError> {
        submission.prediction.validate()?;
        self.ensure_open(&submission.fixture_id)?;

        let record = PredictionRecord {
            key: submission.key(),
            prediction: submission.prediction,
            submitted_at: Utc::now(),
        };
        let stored = self.store_open(record)?;
        debug!(prediction = %stored.key, "prediction stored");
        Ok(stored)
    }

    /// Apply or remove a chip on a stored prediction.
    pub fn apply_chip(
        &self,
        key: &PredictionKey,
        command: ChipCommand,
    ) -> Result<PredictionRecord, SettlementServiceError> {
        let mut record = self
            .repository
            .fetch_prediction(key)?
            .ok_or(RepositoryError::NotFound)?;
        self.ensure_open(&key.fixture_id)?;

        let context = ChipContext {
            user_id: key.user_id.clone(),
            fixture_id: key.fixture_id.clone(),
        };
        record.prediction.chips = record.prediction.chips.apply(
            command,
            self.engine.catalog(),
            self.policy.as_ref(),
            &context,
        )?;
        record.submitted_at = Utc::now();

        self.store_open(record)
    }

    /// Record the full-time result for a fixture. A fixture is settled once.
    pub fn record_result(
        &self,
        fixture_id: FixtureId,
        result: MatchResult,
    ) -> Result<ResultRecord, SettlementServiceError> {
        result.validate()?;
        let record = ResultRecord {
            fixture_id,
            result,
            recorded_at: Utc::now(),
        };
        let stored = self.repository.insert_result(record)?;
        info!(
            fixture = %stored.fixture_id,
            home = stored.result.home_score,
            away = stored.result.away_score,
            "full-time result recorded"
        );
        Ok(stored)
    }

    /// Score a stored prediction against the current result, if any.
    pub fn score(&self, key: &PredictionKey) -> Result<ScoringResult, SettlementServiceError> {
        let record = self
            .repository
            .fetch_prediction(key)?
            .ok_or(RepositoryError::NotFound)?;
        let result = self.repository.fetch_result(&key.fixture_id)?;
        Ok(self.engine.score(
            &record.prediction,
            result.as_ref().map(|stored| &stored.result),
        ))
    }

    /// Best-case points for a stored prediction.
    pub fn preview(&self, key: &PredictionKey) -> Result<Settlement, SettlementServiceError> {
        let record = self
            .repository
            .fetch_prediction(key)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(self.engine.potential(&record.prediction))
    }

    /// Settle every stored prediction and aggregate per user.
    pub fn standings(&self) -> Result<Standings, SettlementServiceError> {
        let mut inputs = Vec::new();
        for record in self.repository.predictions()? {
            let result = self.repository.fetch_result(&record.key.fixture_id)?;
            inputs.push(ScoringInput {
                key: record.key,
                prediction: record.prediction,
                result: result.map(|stored| stored.result),
            });
        }
        Ok(Standings::settle(&self.engine, &inputs))
    }

    fn store_open(
        &self,
        record: PredictionRecord,
    ) -> Result<PredictionRecord, SettlementServiceError> {
        self.repository
            .upsert_prediction_if_open(record)
            .map_err(|err| match err {
                RepositoryError::Locked(fixture_id) => SettlementServiceError::Locked(fixture_id),
                other => SettlementServiceError::Repository(other),
            })
    }

    /// Early rejection; `store_open` re-checks under the repository's lock.
    fn ensure_open(&self, fixture_id: &FixtureId) -> Result<(), SettlementServiceError> {
        if self.repository.fetch_result(fixture_id)?.is_some() {
            return Err(SettlementServiceError::Locked(fixture_id.clone()));
        }
        Ok(())
    }
}

/// Error raised by the settlement service.
#[derive(Debug, thiserror::Error)]
pub enum SettlementServiceError {
    #[error(transparent)]
    InvalidData(#[from] InvalidPredictionData),
    #[error("fixture {0} already has a result; predictions are locked")]
    Locked(FixtureId),
    #[error(transparent)]
    Chip(#[from] ChipRejection),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
