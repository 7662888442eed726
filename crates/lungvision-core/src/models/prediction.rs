//! Prediction payloads returned by the risk-assessment service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors validating a prediction response.
#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Invalid prediction response: missing `{0}` field")]
    MissingField(&'static str),

    #[error("Invalid prediction response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Coarse lung-health risk classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Specialties the directory filters on for this level.
    pub fn recommended_specialties(self) -> &'static [&'static str] {
        match self {
            RiskLevel::High => &["Oncologist", "Thoracic Surgeon"],
            RiskLevel::Medium => &["Pulmonologist", "Internal Medicine"],
            RiskLevel::Low => &["General Physician", "Internal Medicine"],
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

/// Dietary guidance block attached to a prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DietGuidance {
    pub color: String,
    pub bg: String,
    pub title: String,
    /// HTML-flavoured content (`<br>` separated)
    pub content: String,
    pub plain_text: String,
}

/// A labelled chart series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

impl ChartSeries {
    /// Label/value pairs, truncated to the shorter side.
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.data.iter().copied())
    }
}

/// Chart-ready aggregates for the results dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Dashboard {
    /// Lifestyle exposure profile, each value normalized to 0-100
    pub radar: ChartSeries,
    /// Top feature impacts
    pub bar: ChartSeries,
    pub base_value: f64,
}

/// Result of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub prediction: RiskLevel,
    /// Model confidence in percent
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub diet: DietGuidance,
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Base64 PNG of the feature-importance plot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_url: Option<String>,
    #[serde(default)]
    pub dashboard: Dashboard,
}

impl PredictionResult {
    /// Validate and convert a raw JSON response.
    pub fn from_value(value: serde_json::Value) -> Result<Self, PredictionError> {
        match value.get("prediction") {
            None | Some(serde_json::Value::Null) => {
                return Err(PredictionError::MissingField("prediction"))
            }
            Some(_) => {}
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Plot image, ignoring the empty string the service sends when plotting failed.
    pub fn plot(&self) -> Option<&str> {
        self.plot_url.as_deref().filter(|p| !p.is_empty())
    }

    /// Confidence rounded to a whole percent for display.
    pub fn confidence_percent(&self) -> u8 {
        self.confidence.round().clamp(0.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_full() {
        let value = json!({
            "prediction": "High",
            "confidence": 97.5,
            "diet": {"color": "#dc3545", "bg": "#fff5f5", "title": "HIGH RISK PROTOCOL",
                     "content": "a<br>b", "plain_text": "DIET: avoid sugar"},
            "recommendations": ["See a doctor"],
            "plot_url": "",
            "dashboard": {
                "radar": {"labels": ["Smoking"], "data": [87.5]},
                "bar": {"labels": ["Smoking", "Fatigue"], "data": [0.4, -0.1]},
                "base_value": 0.12
            }
        });
        let result = PredictionResult::from_value(value).unwrap();
        assert_eq!(result.prediction, RiskLevel::High);
        assert_eq!(result.confidence_percent(), 98);
        assert_eq!(result.plot(), None);
        assert_eq!(result.dashboard.bar.points().count(), 2);
        assert_eq!(result.diet.title, "HIGH RISK PROTOCOL");
    }

    #[test]
    fn test_missing_prediction_is_rejected() {
        let err = PredictionResult::from_value(json!({"confidence": 50.0})).unwrap_err();
        assert!(matches!(err, PredictionError::MissingField("prediction")));

        let err = PredictionResult::from_value(json!({"prediction": null})).unwrap_err();
        assert!(matches!(err, PredictionError::MissingField("prediction")));
    }

    #[test]
    fn test_unknown_label_is_malformed() {
        let err = PredictionResult::from_value(json!({"prediction": "Severe"})).unwrap_err();
        assert!(matches!(err, PredictionError::Malformed(_)));
    }

    #[test]
    fn test_risk_level_parse_and_specialties() {
        assert_eq!("medium".parse::<RiskLevel>(), Ok(RiskLevel::Medium));
        assert!("none".parse::<RiskLevel>().is_err());
        assert!(RiskLevel::High.recommended_specialties().contains(&"Oncologist"));
        assert!(RiskLevel::Low < RiskLevel::High);
    }
}
