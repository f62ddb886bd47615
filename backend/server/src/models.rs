//! # Records
//!
//! Shapes that cross the HTTP boundary, the predictor boundary and the store.
//!
//! ## Persisted layout
//! - id (**string**, UUID v4), assigned by the store
//! - age (**int**), gender (**string**), symptoms (**list of strings**)
//! - disease (**string**, optional), userId (**string**)
//! - createdAt (**timestamp**), older documents may carry it as `date`
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SAVED_MESSAGE: &str = "Prediction saved";

/// Symptom identifiers the predictor model was trained on.
pub const KNOWN_SYMPTOMS: [&str; 9] = [
    "fever",
    "cough",
    "headache",
    "fatigue",
    "chest_pain",
    "nausea",
    "shortness_of_breath",
    "dizziness",
    "sore_throat",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other(label) => label,
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Other(trimmed.to_string()),
        }
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound submission. Every field is optional so that absence is reported
/// as a validation error instead of an extractor rejection.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub symptoms: Option<Vec<String>>,
    pub user_id: Option<String>,
}

/// A submission that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intake {
    pub age: u32,
    pub gender: Gender,
    pub symptoms: Vec<String>,
    pub user_id: String,
}

#[derive(Clone, Debug)]
pub struct NewPrediction {
    pub age: u32,
    pub gender: Gender,
    pub symptoms: Vec<String>,
    pub disease: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl NewPrediction {
    pub fn from_intake(intake: Intake, disease: String, created_at: DateTime<Utc>) -> Self {
        Self {
            age: intake.age,
            gender: intake.gender,
            symptoms: intake.symptoms,
            disease: Some(disease),
            user_id: intake.user_id,
            created_at,
        }
    }

    pub fn into_record(self, id: String) -> PredictionRecord {
        PredictionRecord {
            id,
            age: self.age,
            gender: self.gender,
            symptoms: self.symptoms,
            disease: self.disease,
            user_id: self.user_id,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRecord {
    pub id: String,
    pub age: u32,
    pub gender: Gender,
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub disease: Option<String>,
    pub user_id: String,
    #[serde(alias = "date")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub message: String,
    pub disease: String,
}

impl PredictionOutcome {
    pub fn saved(disease: String) -> Self {
        Self {
            message: SAVED_MESSAGE.to_string(),
            disease,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub user_id: Option<String>,
}

/// Body sent to the remote predictor.
#[derive(Debug, Serialize)]
pub struct PredictorRequest<'a> {
    pub age: u32,
    pub gender: &'a str,
    pub symptoms: &'a [String],
}
