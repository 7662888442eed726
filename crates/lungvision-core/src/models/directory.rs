//! Specialist directory and administrative record listings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A specialist from `GET /doctors`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Specialty")]
    pub specialty: String,
    #[serde(rename = "Hospital", default)]
    pub hospital: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(rename = "Rating", default)]
    pub rating: f64,
    #[serde(rename = "ImageURL", default)]
    pub image_url: String,
}

/// One row of the patient registry (`GET /registry`).
///
/// Feature columns vary with the deployed model and are kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RegistryEntry {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "Patient Name", default)]
    pub patient_name: Option<String>,
    #[serde(rename = "Diagnosis", default)]
    pub diagnosis: Option<String>,
    #[serde(rename = "Confidence Score", default)]
    pub confidence_score: Option<String>,
    #[serde(flatten)]
    pub features: BTreeMap<String, serde_json::Value>,
}

/// One row of the hospital booking ledger (`GET /hospital-records`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HospitalRecord {
    #[serde(rename = "Timestamp", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "Transaction ID", default)]
    pub transaction_id: Option<String>,
    #[serde(rename = "Payment Status", default)]
    pub payment_status: Option<String>,
    #[serde(rename = "Patient Name", default)]
    pub patient_name: Option<String>,
    #[serde(rename = "Diagnosis", default)]
    pub diagnosis: Option<String>,
    #[serde(rename = "Confidence", default)]
    pub confidence: Option<String>,
    #[serde(rename = "Doctor Name", default)]
    pub doctor_name: Option<String>,
    #[serde(rename = "Specialty", default)]
    pub specialty: Option<String>,
    #[serde(rename = "Appt Date", default)]
    pub appointment_date: Option<String>,
    #[serde(rename = "Appt Time", default)]
    pub appointment_time: Option<String>,
    #[serde(rename = "Fee Paid", default)]
    pub fee_paid: Option<String>,
    #[serde(rename = "Payment Method", default)]
    pub payment_method: Option<String>,
}
