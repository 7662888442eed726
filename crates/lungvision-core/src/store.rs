//! Patient data store.
//!
//! Holds the single questionnaire record for the current session. Every
//! write goes through clamping, so readers never see an out-of-range rating.

use thiserror::Error;

use crate::models::{Field, FieldKind, Gender, PatientRecord};

/// Errors writing a single answer.
#[derive(Error, Debug, PartialEq)]
pub enum PatientError {
    #[error("{field} expects {expected}")]
    WrongKind { field: &'static str, expected: &'static str },

    #[error("Invalid answer for {field}: {input}")]
    InvalidAnswer { field: &'static str, input: String },
}

pub type PatientResult<T> = Result<T, PatientError>;

/// A typed answer for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Text(String),
    Gender(Gender),
    Toggle(bool),
    Rating(u8),
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub is_smoker: Option<bool>,
    pub years_of_smoking: Option<u8>,
    pub smoking_intensity: Option<u8>,
    pub passive_smoking_level: Option<u8>,
    pub alcohol_use: Option<u8>,
    pub obesity_level: Option<u8>,
    pub balanced_diet: Option<u8>,
    pub coughing_blood: Option<u8>,
    pub wheezing: Option<u8>,
    pub shortness_of_breath: Option<u8>,
    pub swallowing_difficulty: Option<u8>,
    pub dry_cough: Option<u8>,
    pub chest_pain: Option<u8>,
    pub snoring: Option<u8>,
    pub fatigue: Option<u8>,
    pub weight_loss: Option<u8>,
    pub clubbing_fingers: Option<u8>,
    pub frequent_colds: Option<u8>,
    pub air_pollution: Option<u8>,
    pub occupational_hazards: Option<u8>,
    pub dust_allergy: Option<u8>,
    pub genetic_risk: Option<bool>,
    pub chronic_lung_disease: Option<bool>,
}

/// Owner of the session's [`PatientRecord`].
#[derive(Debug, Clone, Default)]
pub struct PatientStore {
    record: PatientRecord,
}

impl PatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    /// Merge a partial update into the record.
    pub fn update(&mut self, update: PatientUpdate) {
        let r = &mut self.record;
        if let Some(name) = update.name {
            r.name = name;
        }
        if let Some(gender) = update.gender {
            r.gender = gender;
        }
        if let Some(v) = update.is_smoker {
            r.is_smoker = v;
        }
        if let Some(v) = update.genetic_risk {
            r.genetic_risk = v;
        }
        if let Some(v) = update.chronic_lung_disease {
            r.chronic_lung_disease = v;
        }

        let ratings = [
            (Field::Age, update.age),
            (Field::YearsOfSmoking, update.years_of_smoking),
            (Field::SmokingIntensity, update.smoking_intensity),
            (Field::PassiveSmokingLevel, update.passive_smoking_level),
            (Field::AlcoholUse, update.alcohol_use),
            (Field::ObesityLevel, update.obesity_level),
            (Field::BalancedDiet, update.balanced_diet),
            (Field::CoughingBlood, update.coughing_blood),
            (Field::Wheezing, update.wheezing),
            (Field::ShortnessOfBreath, update.shortness_of_breath),
            (Field::SwallowingDifficulty, update.swallowing_difficulty),
            (Field::DryCough, update.dry_cough),
            (Field::ChestPain, update.chest_pain),
            (Field::Snoring, update.snoring),
            (Field::Fatigue, update.fatigue),
            (Field::WeightLoss, update.weight_loss),
            (Field::ClubbingFingers, update.clubbing_fingers),
            (Field::FrequentColds, update.frequent_colds),
            (Field::AirPollution, update.air_pollution),
            (Field::OccupationalHazards, update.occupational_hazards),
            (Field::DustAllergy, update.dust_allergy),
        ];
        for (field, value) in ratings {
            if let Some(value) = value {
                r.set_rating(field, value);
            }
        }
    }

    /// Write one answer, checking it matches the field's kind.
    pub fn answer(&mut self, field: Field, answer: Answer) -> PatientResult<()> {
        match (field.kind(), answer) {
            (FieldKind::Text, Answer::Text(text)) => {
                self.record.name = text.trim().to_string();
            }
            (FieldKind::Choice, Answer::Gender(gender)) => {
                self.record.gender = gender;
            }
            (FieldKind::Toggle, Answer::Toggle(value)) => {
                self.record.set_flag(field, value);
            }
            (FieldKind::Rating { .. }, Answer::Rating(value)) => {
                self.record.set_rating(field, value);
            }
            (kind, _) => {
                return Err(PatientError::WrongKind {
                    field: field.label(),
                    expected: match kind {
                        FieldKind::Text => "text",
                        FieldKind::Choice => "a choice",
                        FieldKind::Toggle => "yes or no",
                        FieldKind::Rating { .. } => "a number",
                    },
                })
            }
        }
        Ok(())
    }

    /// Parse free-form input for a field and write it.
    pub fn answer_str(&mut self, field: Field, input: &str) -> PatientResult<()> {
        let invalid = || PatientError::InvalidAnswer {
            field: field.label(),
            input: input.trim().to_string(),
        };
        let answer = match field.kind() {
            FieldKind::Text => Answer::Text(input.to_string()),
            FieldKind::Choice => Answer::Gender(Gender::parse(input).ok_or_else(invalid)?),
            FieldKind::Toggle => match input.trim().to_lowercase().as_str() {
                "y" | "yes" | "true" | "1" => Answer::Toggle(true),
                "n" | "no" | "false" | "0" => Answer::Toggle(false),
                _ => return Err(invalid()),
            },
            FieldKind::Rating { .. } => {
                let value: i64 = input.trim().parse().map_err(|_| invalid())?;
                Answer::Rating(value.clamp(0, i64::from(u8::MAX)) as u8)
            }
        };
        self.answer(field, answer)
    }

    /// Discard all answers and return to defaults.
    pub fn reset(&mut self) {
        self.record = PatientRecord::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_merges_and_clamps() {
        let mut store = PatientStore::new();
        store.update(PatientUpdate {
            name: Some("Ravi".into()),
            is_smoker: Some(true),
            smoking_intensity: Some(20),
            passive_smoking_level: Some(0),
            ..Default::default()
        });
        let record = store.record();
        assert_eq!(record.name, "Ravi");
        assert!(record.is_smoker);
        assert_eq!(record.smoking_intensity, 9);
        assert_eq!(record.passive_smoking_level, 0);
        // untouched
        assert_eq!(record.age, 30);
    }

    #[test]
    fn test_reset() {
        let mut store = PatientStore::new();
        store.update(PatientUpdate {
            age: Some(71),
            genetic_risk: Some(true),
            ..Default::default()
        });
        store.reset();
        assert_eq!(store.record(), &PatientRecord::default());
    }

    #[test]
    fn test_answer_str() {
        let mut store = PatientStore::new();
        store.answer_str(Field::Age, "55").unwrap();
        store.answer_str(Field::Gender, "f").unwrap();
        store.answer_str(Field::ChronicLungDisease, "yes").unwrap();
        store.answer_str(Field::Wheezing, "-4").unwrap();
        store.answer_str(Field::Fatigue, "1000").unwrap();

        let record = store.record();
        assert_eq!(record.age, 55);
        assert_eq!(record.gender, Gender::Female);
        assert!(record.chronic_lung_disease);
        assert_eq!(record.wheezing, 1);
        assert_eq!(record.fatigue, 9);
    }

    #[test]
    fn test_answer_str_rejects_garbage() {
        let mut store = PatientStore::new();
        let err = store.answer_str(Field::Wheezing, "often").unwrap_err();
        assert_eq!(
            err,
            PatientError::InvalidAnswer {
                field: "Wheezing",
                input: "often".into()
            }
        );
        assert!(store.answer_str(Field::GeneticRisk, "maybe").is_err());
    }

    #[test]
    fn test_answer_wrong_kind() {
        let mut store = PatientStore::new();
        let err = store.answer(Field::Age, Answer::Toggle(true)).unwrap_err();
        assert!(matches!(err, PatientError::WrongKind { field: "Age", .. }));
    }
}
