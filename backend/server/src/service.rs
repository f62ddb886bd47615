//! # Prediction Flow
//!
//! 1. Validate the submission, nothing leaves the process if it is incomplete
//! 2. Ask the remote predictor for a disease label
//! 3. Persist the record with that label
//! 4. Answer only once the write went through
//!
//! A submission makes exactly one predictor call and, when that succeeds,
//! exactly one write. Identical submissions are stored as separate records.
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::{
    database::RecordStore,
    error::AppError,
    models::{NewPrediction, PredictionOutcome, PredictionRecord, Submission},
    predictor::Predictor,
    utils::validate_submission,
};

#[derive(Clone)]
pub struct PredictionService {
    predictor: Arc<dyn Predictor>,
    store: Arc<dyn RecordStore>,
}

impl PredictionService {
    pub fn new(predictor: Arc<dyn Predictor>, store: Arc<dyn RecordStore>) -> Self {
        Self { predictor, store }
    }

    pub async fn submit(&self, submission: Submission) -> Result<PredictionOutcome, AppError> {
        let intake = validate_submission(submission).inspect_err(|e| {
            warn!("Rejected submission: {e}");
        })?;
        let created_at = Utc::now();

        let disease = self
            .predictor
            .predict(intake.age, &intake.gender, &intake.symptoms)
            .await?;

        let record = self
            .store
            .insert(NewPrediction::from_intake(intake, disease.clone(), created_at))
            .await?;

        info!("Saved prediction {} for user {}", record.id, record.user_id);

        Ok(PredictionOutcome::saved(disease))
    }

    pub async fn history(&self, user_id: &str) -> Result<Vec<PredictionRecord>, AppError> {
        let records = self.store.list_by_user(user_id).await?;

        #[cfg(feature = "verbose")]
        info!("Found {} predictions for {}", records.len(), user_id);

        Ok(records)
    }
}
