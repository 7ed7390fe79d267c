use metrics_exporter_prometheus::PrometheusHandle;
use scoreline::error::AppError;
use scoreline::settlement::{
    FixtureId, MatchResult, Prediction, PredictionKey, PredictionRecord, RepositoryError,
    ResultRecord, ScoringEngine, SettlementRepository,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) engine: Arc<ScoringEngine>,
}

/// Stateless scoring request: a prediction and, once known, the full-time result.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) prediction: Prediction,
    #[serde(default)]
    pub(crate) result: Option<MatchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) prediction: Prediction,
}

pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[derive(Default)]
struct SettlementStore {
    predictions: HashMap<PredictionKey, PredictionRecord>,
    results: HashMap<FixtureId, ResultRecord>,
}

/// Predictions and results share one lock so a result can never slip between the
/// open-fixture check and a prediction write.
#[derive(Default, Clone)]
pub(crate) struct InMemorySettlementRepository {
    store: Arc<Mutex<SettlementStore>>,
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::Unavailable("repository lock poisoned".to_string())
}

impl SettlementRepository for InMemorySettlementRepository {
    fn upsert_prediction_if_open(
        &self,
        record: PredictionRecord,
    ) -> Result<PredictionRecord, RepositoryError> {
        let mut guard = self.store.lock().map_err(poisoned)?;
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
        let guard = self.store.lock().map_err(poisoned)?;
        Ok(guard.predictions.get(key).cloned())
    }

    fn predictions(&self) -> Result<Vec<PredictionRecord>, RepositoryError> {
        let guard = self.store.lock().map_err(poisoned)?;
        Ok(guard.predictions.values().cloned().collect())
    }

    fn insert_result(&self, record: ResultRecord) -> Result<ResultRecord, RepositoryError> {
        let mut guard = self.store.lock().map_err(poisoned)?;
        if guard.results.contains_key(&record.fixture_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.results.insert(record.fixture_id.clone(), record.clone());
        Ok(record)
    }

    fn fetch_result(&self, fixture_id: &FixtureId) -> Result<Option<ResultRecord>, RepositoryError> {
        let guard = self.store.lock().map_err(poisoned)?;
        Ok(guard.results.get(fixture_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scoreline::settlement::UserId;

    fn result_record(fixture: &str) -> ResultRecord {
        ResultRecord {
            fixture_id: FixtureId(fixture.to_string()),
            result: MatchResult::default(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn results_are_write_once() {
        let repository = InMemorySettlementRepository::default();
        repository
            .insert_result(result_record("ars-tot"))
            .expect("first insert");

        assert!(matches!(
            repository.insert_result(result_record("ars-tot")),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn predictions_are_replaced_by_key() {
        let repository = InMemorySettlementRepository::default();
        let key = PredictionKey {
            user_id: UserId("ana".to_string()),
            fixture_id: FixtureId("ars-tot".to_string()),
        };
        for home_score in [1, 3] {
            repository
                .upsert_prediction_if_open(PredictionRecord {
                    key: key.clone(),
                    prediction: Prediction {
                        home_score,
                        away_score: 0,
                        home_scorers: vec!["Saka".to_string(); usize::from(home_score)],
                        ..Prediction::default()
                    },
                    submitted_at: Utc::now(),
                })
                .expect("upsert");
        }

        let stored = repository
            .fetch_prediction(&key)
            .expect("fetch")
            .expect("present");
        assert_eq!(stored.prediction.home_score, 3);
        assert_eq!(repository.predictions().expect("list").len(), 1);
    }

    #[test]
    fn settled_fixtures_refuse_prediction_writes() {
        let repository = InMemorySettlementRepository::default();
        repository
            .insert_result(result_record("ars-tot"))
            .expect("result stored");

        let outcome = repository.upsert_prediction_if_open(PredictionRecord {
            key: PredictionKey {
                user_id: UserId("ana".to_string()),
                fixture_id: FixtureId("ars-tot".to_string()),
            },
            prediction: Prediction::default(),
            submitted_at: Utc::now(),
        });

        assert!(matches!(outcome, Err(RepositoryError::Locked(fixture)) if fixture.0 == "ars-tot"));
        assert!(repository.predictions().expect("list").is_empty());
    }

    #[test]
    fn score_request_result_is_optional() {
        let request: ScoreRequest = serde_json::from_str(
            r#"{ "prediction": { "home_score": 0, "away_score": 0 } }"#,
        )
        .expect("request parses");
        assert!(request.result.is_none());
    }
}
