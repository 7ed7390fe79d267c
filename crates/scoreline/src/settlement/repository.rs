use super::domain::{FixtureId, PredictionKey, PredictionRecord, ResultRecord};

/// Storage abstraction so the settlement service can be exercised in isolation.
pub trait SettlementRepository: Send + Sync {
    /// Inserts or replaces the prediction stored under `record.key` while its fixture has no
    /// result. The result check and the write must be atomic with respect to `insert_result`;
    /// a settled fixture yields `Locked`.
    fn upsert_prediction_if_open(
        &self,
        record: PredictionRecord,
    ) -> Result<PredictionRecord, RepositoryError>;
    fn fetch_prediction(
        &self,
        key: &PredictionKey,
    ) -> Result<Option<PredictionRecord>, RepositoryError>;
    fn predictions(&self) -> Result<Vec<PredictionRecord>, RepositoryError>;
    /// Stores a result; `Conflict` when the fixture already has one.
    fn insert_result(&self, record: ResultRecord) -> Result<ResultRecord, RepositoryError>;
    fn fetch_result(&self, fixture_id: &FixtureId) -> Result<Option<ResultRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("fixture {0} already has a result")]
    Locked(FixtureId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
