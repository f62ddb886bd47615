use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use crate::{
    error::AppError,
    models::{Gender, Intake, Submission},
};

pub const MISSING_FIELDS: &str = "All fields are required";
pub const INVALID_AGE: &str = "Age must be a positive integer";
pub const MISSING_USER_ID: &str = "userId is required";

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\-]+").unwrap());
static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}_]").unwrap());
static UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Turns free-form symptom labels such as `"Chest Pain"` into the
/// identifiers the predictor expects (`"chest_pain"`). Letters and digits of
/// any script are kept.
pub fn sanitize_symptom(input: &str) -> String {
    let s = input.trim().to_lowercase();
    let s = SEPARATORS.replace_all(&s, "_");
    let s = DISALLOWED.replace_all(&s, "");
    let s = UNDERSCORES.replace_all(&s, "_");

    s.trim_matches('_').to_string()
}

/// Sanitizes every symptom, dropping empties and repeats while keeping the
/// first occurrence order.
pub fn sanitize_symptoms(symptoms: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();

    symptoms
        .iter()
        .map(|symptom| sanitize_symptom(symptom))
        .filter(|symptom| !symptom.is_empty())
        .filter(|symptom| seen.insert(symptom.clone()))
        .collect()
}

pub fn validate_submission(submission: Submission) -> Result<Intake, AppError> {
    let Submission {
        age,
        gender,
        symptoms,
        user_id,
    } = submission;

    let (Some(age), Some(gender), Some(symptoms), Some(user_id)) = (age, gender, symptoms, user_id)
    else {
        return Err(AppError::Validation(MISSING_FIELDS));
    };

    let gender = gender.trim();
    let user_id = user_id.trim();
    let symptoms = sanitize_symptoms(&symptoms);

    if gender.is_empty() || user_id.is_empty() || symptoms.is_empty() {
        return Err(AppError::Validation(MISSING_FIELDS));
    }

    let age = u32::try_from(age)
        .ok()
        .filter(|age| *age > 0)
        .ok_or(AppError::Validation(INVALID_AGE))?;

    Ok(Intake {
        age,
        gender: Gender::from(gender.to_string()),
        symptoms,
        user_id: user_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> Submission {
        Submission {
            age: Some(34),
            gender: Some("male".to_string()),
            symptoms: Some(vec!["Fever".to_string(), "cough".to_string()]),
            user_id: Some("u1".to_string()),
        }
    }

    #[test]
    fn test_basic() {
        assert_eq!(sanitize_symptom("fever"), "fever");
        assert_eq!(sanitize_symptom("Chest Pain"), "chest_pain");
        assert_eq!(sanitize_symptom("shortness-of-breath"), "shortness_of_breath");
    }

    #[test]
    fn test_leading_trailing_spaces() {
        assert_eq!(sanitize_symptom("   sore throat   "), "sore_throat");
        assert_eq!(sanitize_symptom("  multiple   spaces  "), "multiple_spaces");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(sanitize_symptom("!@#$%^&*()"), "");
        assert_eq!(sanitize_symptom("nausea!!"), "nausea");
        assert_eq!(sanitize_symptom("__chest__pain__"), "chest_pain");
    }

    #[test]
    fn test_non_ascii_symptoms_kept() {
        assert_eq!(sanitize_symptom("Fièvre"), "fièvre");
        assert_eq!(sanitize_symptom("Фебре"), "фебре");
        assert_eq!(sanitize_symptom("頭痛"), "頭痛");
        assert_eq!(sanitize_symptom("mal de tête"), "mal_de_tête");
    }

    #[test]
    fn test_non_ascii_submission_accepted() {
        let case = Submission {
            symptoms: Some(vec!["фебре".to_string(), "頭痛".to_string()]),
            gender: Some("Non-binary".to_string()),
            ..submission()
        };

        let intake = validate_submission(case).unwrap();

        assert_eq!(intake.symptoms, vec!["фебре", "頭痛"]);
        assert_eq!(intake.gender, Gender::Other("Non-binary".to_string()));
    }

    #[test]
    fn test_duplicates_and_empties_dropped() {
        let symptoms = vec![
            "Fever".to_string(),
            "cough".to_string(),
            " fever ".to_string(),
            "   ".to_string(),
        ];

        assert_eq!(sanitize_symptoms(&symptoms), vec!["fever", "cough"]);
    }

    #[test]
    fn test_valid_submission() {
        let intake = validate_submission(submission()).unwrap();

        assert_eq!(intake.age, 34);
        assert_eq!(intake.gender, Gender::Male);
        assert_eq!(intake.symptoms, vec!["fever", "cough"]);
        assert_eq!(intake.user_id, "u1");
    }

    #[test]
    fn test_missing_fields() {
        let cases = [
            Submission { age: None, ..submission() },
            Submission { gender: None, ..submission() },
            Submission { symptoms: None, ..submission() },
            Submission { user_id: None, ..submission() },
            Submission { gender: Some("  ".to_string()), ..submission() },
            Submission { user_id: Some(String::new()), ..submission() },
            Submission { symptoms: Some(vec![]), ..submission() },
            Submission { symptoms: Some(vec!["???".to_string()]), ..submission() },
        ];

        for case in cases {
            assert!(matches!(
                validate_submission(case),
                Err(AppError::Validation(MISSING_FIELDS))
            ));
        }
    }

    #[test]
    fn test_non_positive_age() {
        for age in [0, -3, i64::from(u32::MAX) + 1] {
            let case = Submission { age: Some(age), ..submission() };

            assert!(matches!(
                validate_submission(case),
                Err(AppError::Validation(INVALID_AGE))
            ));
        }
    }
}
