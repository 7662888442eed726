//! Client-side risk heuristic.
//!
//! A weighted sum over the questionnaire, normalized to 0-100. This is an
//! informational estimate; the prediction service is the authoritative
//! source of a patient's risk level.

use serde::{Deserialize, Serialize};

use crate::models::{PatientRecord, RiskLevel, SEVERITY_MAX};

/// Raw sum that maps to a score of 100.
pub const MAX_RAW_SCORE: f64 = 200.0;
pub const MEDIUM_THRESHOLD: u8 = 30;
pub const HIGH_THRESHOLD: u8 = 60;

const GENETIC_RISK_BONUS: f64 = 15.0;
const CHRONIC_LUNG_DISEASE_BONUS: f64 = 20.0;

/// Output of [`calculate_risk`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// 0-100
    pub score: u8,
}

/// Band a 0-100 score.
pub fn level_for_score(score: u8) -> RiskLevel {
    if score < MEDIUM_THRESHOLD {
        RiskLevel::Low
    } else if score < HIGH_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Weighted sum before normalization.
pub fn raw_score(p: &PatientRecord) -> f64 {
    let w = |value: u8, weight: f64| f64::from(value) * weight;
    let mut sum = 0.0;

    // Lifestyle
    if p.is_smoker {
        sum += w(p.years_of_smoking, 2.0);
        sum += w(p.smoking_intensity, 3.0);
    }
    sum += w(p.passive_smoking_level, 1.0);
    sum += w(p.alcohol_use, 1.5);
    sum += w(p.obesity_level, 1.5);
    sum += w(SEVERITY_MAX.saturating_sub(p.balanced_diet), 1.5);

    // Respiratory; hemoptysis carries the highest weight
    sum += w(p.coughing_blood, 5.0);
    sum += w(p.wheezing, 2.0);
    sum += w(p.shortness_of_breath, 3.0);
    sum += w(p.swallowing_difficulty, 2.0);
    sum += w(p.dry_cough, 2.0);
    sum += w(p.chest_pain, 3.0);
    sum += w(p.snoring, 1.0);

    // Systemic
    sum += w(p.fatigue, 2.0);
    sum += w(p.weight_loss, 3.0);
    sum += w(p.clubbing_fingers, 4.0);
    sum += w(p.frequent_colds, 1.5);

    // Environment and history
    sum += w(p.air_pollution, 2.0);
    sum += w(p.occupational_hazards, 2.0);
    sum += w(p.dust_allergy, 1.5);
    if p.genetic_risk {
        sum += GENETIC_RISK_BONUS;
    }
    if p.chronic_lung_disease {
        sum += CHRONIC_LUNG_DISEASE_BONUS;
    }

    sum
}

/// Map a record to a risk level and a 0-100 score.
pub fn calculate_risk(record: &PatientRecord) -> RiskAssessment {
    let normalized = (raw_score(record) * 100.0 / MAX_RAW_SCORE).min(100.0);
    let score = normalized.round().clamp(0.0, 100.0) as u8;
    RiskAssessment {
        level: level_for_score(score),
        score,
    }
}
