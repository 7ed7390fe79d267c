use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::settlement::chips::{
    AllowAllChips, ChipContext, ChipDefinition, ChipEligibility, ChipRejection,
};
use crate::settlement::domain::{
    Chip, ChipSet, FixtureId, MatchResult, Prediction, PredictionKey, PredictionRecord,
    PredictionSubmission, ResultRecord, UserId,
};
use crate::settlement::evaluation::{ScoringEngine, ScoringResult, Settlement};
use crate::settlement::repository::{RepositoryError, SettlementRepository};
use crate::settlement::{settlement_router, SettlementService};

pub(super) fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|name| name.to_string()).collect()
}

pub(super) fn prediction(
    home: u16,
    away: u16,
    home_scorers: &[&str],
    away_scorers: &[&str],
    chips: &[Chip],
) -> Prediction {
    Prediction {
        home_score: home,
        away_score: away,
        home_scorers: names(home_scorers),
        away_scorers: names(away_scorers),
        chips: chips.iter().copied().collect::<ChipSet>(),
    }
}

pub(super) fn result(home: u16, away: u16, home_scorers: &[&str], away_scorers: &[&str]) -> MatchResult {
    MatchResult {
        home_score: home,
        away_score: away,
        home_scorers: names(home_scorers),
        away_scorers: names(away_scorers),
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::standard()
}

pub(super) fn settle(prediction: &Prediction, result: &MatchResult) -> Settlement {
    match engine().score(prediction, Some(result)) {
        ScoringResult::Settled(settlement) => settlement,
        ScoringResult::Pending => panic!("a present result must settle"),
    }
}

pub(super) fn key(user: &str, fixture: &str) -> PredictionKey {
    PredictionKey {
        user_id: UserId(user.to_string()),
        fixture_id: FixtureId(fixture.to_string()),
    }
}

pub(super) fn submission(user: &str, fixture: &str, prediction: Prediction) -> PredictionSubmission {
    PredictionSubmission {
        user_id: UserId(user.to_string()),
        fixture_id: FixtureId(fixture.to_string()),
        prediction,
    }
}

/// Arsenal 2-1 Spurs, called perfectly.
pub(super) fn derby_prediction() -> Prediction {
    prediction(2, 1, &["Saka", "Martinelli"], &["Son"], &[])
}

pub(super) fn derby_result() -> MatchResult {
    result(2, 1, &["Saka", "Martinelli"], &["Son"])
}

#[derive(Default)]
pub(super) struct MemoryStore {
    predictions: HashMap<PredictionKey, PredictionRecord>,
    results: HashMap<FixtureId, ResultRecord>,
}

/// Both maps sit behind one lock so the open-fixture check and the write are atomic.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) store: Arc<Mutex<MemoryStore>>,
}

impl SettlementRepository for MemoryRepository {
    fn upsert_prediction_if_open(
        &self,
        record: PredictionRecord,
    ) -> Result<PredictionRecord, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.results.contains_key(&record.key.fixture_id) {
            return Err(RepositoryError::Locked(record.key.fixture_id));
        }
        guard.predictions.insert(record.key.clone(), record.clone());
        Ok(record)
    }

    fn fetch_prediction(
        &self,
        key: &PredictionKey,
    ) -> Result<Option<PredictionRecord>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.predictions.get(key).cloned())
    }

    fn predictions(&self) -> Result<Vec<PredictionRecord>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.predictions.values().cloned().collect())
    }

    fn insert_result(&self, record: ResultRecord) -> Result<ResultRecord, RepositoryError> {
        let mut guard = self.store.lock().expect("repository mutex poisoned");
        if guard.results.contains_key(&record.fixture_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.results.insert(record.fixture_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch_result(&self, fixture_id: &FixtureId) -> Result<Option<ResultRecord>, RepositoryError> {
        let guard = self.store.lock().expect("repository mutex poisoned");
        Ok(guard.results.get(fixture_id).cloned())
    }
}

/// Records a queued result right after answering the first `fetch_result`, as if the results
/// feed landed between the service's early check and its write.
#[derive(Default)]
pub(super) struct ResultLandsMidway {
    pub(super) inner: MemoryRepository,
    pub(super) queued: Mutex<Option<ResultRecord>>,
}

impl ResultLandsMidway {
    pub(super) fn queue(inner: MemoryRepository, fixture: &str, result: MatchResult) -> Self {
        Self {
            inner,
            queued: Mutex::new(Some(ResultRecord {
                fixture_id: FixtureId(fixture.to_string()),
                result,
                recorded_at: Utc::now(),
            })),
        }
    }
}

impl SettlementRepository for ResultLandsMidway {
    fn upsert_prediction_if_open(
        &self,
        record: PredictionRecord,
    ) -> Result<PredictionRecord, RepositoryError> {
        self.inner.upsert_prediction_if_open(record)
    }

    fn fetch_prediction(
        &self,
        key: &PredictionKey,
    ) -> Result<Option<PredictionRecord>, RepositoryError> {
        self.inner.fetch_prediction(key)
    }

    fn predictions(&self) -> Result<Vec<PredictionRecord>, RepositoryError> {
        self.inner.predictions()
    }

    fn insert_result(&self, record: ResultRecord) -> Result<ResultRecord, RepositoryError> {
        self.inner.insert_result(record)
    }

    fn fetch_result(&self, fixture_id: &FixtureId) -> Result<Option<ResultRecord>, RepositoryError> {
        let answer = self.inner.fetch_result(fixture_id)?;
        let queued = self.queued.lock().expect("queue mutex poisoned").take();
        if let Some(record) = queued {
            self.inner.insert_result(record)?;
        }
        Ok(answer)
    }
}

#[derive(Default)]
pub(super) struct UnavailableRepository;

impl SettlementRepository for UnavailableRepository {
    fn upsert_prediction_if_open(
        &self,
        _record: PredictionRecord,
    ) -> Result<PredictionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn fetch_prediction(
        &self,
        _key: &PredictionKey,
    ) -> Result<Option<PredictionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn predictions(&self) -> Result<Vec<PredictionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn insert_result(&self, _record: ResultRecord) -> Result<ResultRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn fetch_result(&self, _fixture_id: &FixtureId) -> Result<Option<ResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }
}

/// Refuses every chip as if its season allowance were spent.
pub(super) struct SpentChips;

impl ChipEligibility for SpentChips {
    fn check(&self, chip: &ChipDefinition, _context: &ChipContext) -> Result<(), ChipRejection> {
        Err(ChipRejection::SeasonLimitReached {
            chip: chip.chip,
            limit: chip.season_limit,
        })
    }
}

pub(super) fn build_service() -> (
    SettlementService<MemoryRepository, AllowAllChips>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = SettlementService::new(
        repository.clone(),
        Arc::new(AllowAllChips),
        ScoringEngine::standard(),
    );
    (service, repository)
}

pub(super) fn settlement_router_with_service(
    service: SettlementService<MemoryRepository, AllowAllChips>,
) -> axum::Router {
    settlement_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
