//! # Remote Predictor
//!
//! The disease model runs as a separate HTTP service. We POST the intake as
//! JSON and expect back a body of the form `{"prediction": "<label>"}`.
//!
//! - Any non-2xx status is a failure, no retries
//! - The whole exchange (send + body read) is bounded by the configured timeout
//! - The body is checked for shape before the label is trusted
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::{
    config::Config,
    models::{Gender, PredictorRequest},
};

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Predictor returned status {0}")]
    Status(StatusCode),

    #[error("Predictor unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Predictor timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed predictor response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(
        &self,
        age: u32,
        gender: &Gender,
        symptoms: &[String],
    ) -> Result<String, PredictorError>;
}

pub struct HttpPredictor {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpPredictor {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PredictorError> {
        let client = Client::builder().connect_timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PredictorError> {
        Self::new(config.predictor_url.clone(), config.predictor_timeout)
    }

    async fn exchange(&self, request: &PredictorRequest<'_>) -> Result<String, PredictorError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictorError::Status(status));
        }

        let body = response.text().await?;

        parse_prediction(&body)
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(
        &self,
        age: u32,
        gender: &Gender,
        symptoms: &[String],
    ) -> Result<String, PredictorError> {
        let request = PredictorRequest {
            age,
            gender: gender.as_str(),
            symptoms,
        };

        let disease = timeout(self.timeout, self.exchange(&request))
            .await
            .map_err(|_| PredictorError::Timeout(self.timeout))?
            .inspect_err(|e| warn!("Prediction request failed: {e}"))?;

        info!("Predictor answered {disease}");

        Ok(disease)
    }
}

pub fn parse_prediction(body: &str) -> Result<String, PredictorError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| PredictorError::MalformedResponse(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(PredictorError::MalformedResponse(
            "response is not a JSON object".to_string(),
        ));
    };

    let prediction = match fields.get("prediction") {
        Some(Value::String(label)) => label,
        Some(other) => {
            return Err(PredictorError::MalformedResponse(format!(
                "prediction is not a string: {other}"
            )));
        }
        None => {
            return Err(PredictorError::MalformedResponse(
                "missing prediction field".to_string(),
            ));
        }
    };

    if prediction.trim().is_empty() {
        return Err(PredictorError::MalformedResponse(
            "empty prediction label".to_string(),
        ));
    }

    Ok(prediction.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prediction() {
        assert_eq!(parse_prediction(r#"{"prediction":"Flu"}"#).unwrap(), "Flu");
        assert_eq!(
            parse_prediction(r#"{"prediction":"Heart Issue","confidence":0.7}"#).unwrap(),
            "Heart Issue"
        );
    }

    #[test]
    fn test_parse_prediction_rejects_bad_shapes() {
        for body in [
            "",
            "not json",
            "{}",
            r#"{"disease":"Flu"}"#,
            r#"{"prediction":42}"#,
            r#"{"prediction":null}"#,
            r#"{"prediction":"   "}"#,
            r#"["Flu"]"#,
            r#"[{"prediction":"Flu"}]"#,
            r#""Flu""#,
        ] {
            assert!(
                matches!(
                    parse_prediction(body),
                    Err(PredictorError::MalformedResponse(_))
                ),
                "accepted {body:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_unreachable_predictor() {
        // Port 9 (discard) is closed on test hosts, the connect fails fast.
        let predictor =
            HttpPredictor::new("http://127.0.0.1:9/predict", Duration::from_secs(2)).unwrap();

        let result = predictor
            .predict(34, &Gender::Male, &["fever".to_string()])
            .await;

        assert!(matches!(
            result,
            Err(PredictorError::Transport(_) | PredictorError::Timeout(_))
        ));
    }
}
