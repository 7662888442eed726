//! Printable booking receipts and medical reports.
//!
//! Each document carries a SHA-256 digest over its canonical JSON form so a
//! printed copy can be checked against the session's data.

use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::{BookingRecord, Gender, PatientRecord, PredictionResult, RiskLevel};

/// Hex-encoded SHA-256 of arbitrary bytes.
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("Could not serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Could not format document")]
    Format(#[from] fmt::Error),
}

pub type ReceiptResult<T> = Result<T, ReceiptError>;

fn digest_of<T: Serialize>(value: &T) -> serde_json::Result<String> {
    Ok(hash_data(&serde_json::to_vec(value)?))
}

/// Appointment confirmation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingReceipt {
    pub booking_id: String,
    pub timestamp: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub specialty: String,
    pub date: String,
    pub time: String,
    pub payment_method: String,
    pub amount: String,
}

impl From<&BookingRecord> for BookingReceipt {
    fn from(record: &BookingRecord) -> Self {
        Self {
            booking_id: record.booking_id.clone(),
            timestamp: record.created_at.clone(),
            patient_name: record.patient_name.clone(),
            doctor_name: record.doctor.name.clone(),
            specialty: record.doctor.specialty.clone(),
            date: record.long_date(),
            time: record.time.clone(),
            payment_method: record.payment_method.as_str().to_string(),
            amount: record.amount(),
        }
    }
}

impl BookingReceipt {
    pub fn digest(&self) -> serde_json::Result<String> {
        digest_of(self)
    }

    /// File name for a saved copy.
    pub fn file_name(&self) -> String {
        let name = self.patient_name.trim();
        let name = if name.is_empty() { "Patient" } else { name };
        format!("Booking-Confirmation-{}.txt", name.replace(char::is_whitespace, "-"))
    }

    pub fn render(&self) -> ReceiptResult<String> {
        let digest = self.digest()?;
        let mut out = String::new();
        self.write_to(&mut out, &digest)?;
        Ok(out)
    }

    fn write_to(&self, out: &mut String, digest: &str) -> fmt::Result {
        writeln!(out, "LUNGVISION AI  ·  APPOINTMENT CONFIRMED")?;
        writeln!(out, "Booking #{}", self.booking_id)?;
        writeln!(out, "Issued {}", self.timestamp)?;
        writeln!(out)?;
        writeln!(out, "Patient        {}", self.patient_name)?;
        writeln!(out, "Specialist     {} ({})", self.doctor_name, self.specialty)?;
        writeln!(out, "Date           {}", self.date)?;
        writeln!(out, "Time           {}", self.time)?;
        writeln!(out, "Payment        {}", self.payment_method)?;
        writeln!(out, "Amount paid    {}", self.amount)?;
        writeln!(out)?;
        writeln!(out, "Verification   {digest}")
    }
}

/// One line of the vitals table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vital {
    pub label: String,
    pub value: String,
}

/// Screening report for the patient's file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalReport {
    pub consultation_id: String,
    pub report_date: String,
    pub patient_name: String,
    pub risk_level: RiskLevel,
    /// Percent
    pub risk_score: u8,
    pub doctor_note: String,
    pub vitals: Vec<Vital>,
}

impl MedicalReport {
    pub fn new(patient: &PatientRecord, risk_level: RiskLevel, risk_score: u8, doctor_note: String) -> Self {
        let consultation_id = format!(
            "LV-{}",
            &uuid::Uuid::new_v4().simple().to_string()[..8].to_uppercase()
        );
        Self {
            consultation_id,
            report_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
            patient_name: patient.display_name().to_string(),
            risk_level,
            risk_score: risk_score.min(100),
            doctor_note,
            vitals: vitals_for(patient),
        }
    }

    /// Report for a server prediction; the score is the model confidence.
    pub fn from_prediction(patient: &PatientRecord, prediction: &PredictionResult) -> Self {
        let note = if prediction.diet.plain_text.is_empty() {
            prediction.recommendations.join(" ")
        } else {
            prediction.diet.plain_text.clone()
        };
        Self::new(
            patient,
            prediction.prediction,
            prediction.confidence_percent(),
            note,
        )
    }

    pub fn digest(&self) -> serde_json::Result<String> {
        digest_of(self)
    }

    pub fn render(&self) -> ReceiptResult<String> {
        let digest = self.digest()?;
        let mut out = String::new();
        self.write_to(&mut out, &digest)?;
        Ok(out)
    }

    fn write_to(&self, out: &mut String, digest: &str) -> fmt::Result {
        writeln!(out, "LUNGVISION AI  ·  SCREENING REPORT")?;
        writeln!(out, "Report Date    {}", self.report_date)?;
        writeln!(out, "ID             {}", self.consultation_id)?;
        writeln!(out)?;
        writeln!(out, "Patient        {}", self.patient_name)?;
        writeln!(out, "Risk Level     {}", self.risk_level)?;
        writeln!(out, "Risk Score     {}%", self.risk_score)?;
        writeln!(out)?;
        for vital in &self.vitals {
            writeln!(out, "  {:<24}{}", vital.label, vital.value)?;
        }
        writeln!(out)?;
        writeln!(out, "Note: {}", self.doctor_note)?;
        writeln!(out)?;
        writeln!(out, "Verification   {digest}")
    }
}

fn vitals_for(patient: &PatientRecord) -> Vec<Vital> {
    let vital = |label: &str, value: String| Vital {
        label: label.to_string(),
        value,
    };
    let gender = match patient.gender {
        Gender::Male => "Male",
        Gender::Female => "Female",
        Gender::Unspecified => "Not specified",
    };
    let smoking = if patient.is_smoker {
        format!(
            "Yes, {} yrs, intensity {}/9",
            patient.years_of_smoking, patient.smoking_intensity
        )
    } else {
        "No".to_string()
    };
    vec![
        vital("Age", format!("{} years", patient.age)),
        vital("Gender", gender.to_string()),
        vital("Smoker", smoking),
        vital("Coughing of Blood", format!("{}/9", patient.coughing_blood)),
        vital("Shortness of Breath", format!("{}/9", patient.shortness_of_breath)),
        vital("Chest Pain", format!("{}/9", patient.chest_pain)),
        vital("Weight Loss", format!("{}/9", patient.weight_loss)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Doctor, PaymentMethod};
    use chrono::NaiveDate;

    fn booking() -> BookingRecord {
        BookingRecord::new(
            "Asha Nair".into(),
            Doctor {
                id: 3,
                name: "Dr. Raj Menon".into(),
                specialty: "Thoracic Surgeon".into(),
                hospital: "Amrita Hospital".into(),
                location: "Kochi".into(),
                rating: 4.7,
                image_url: String::new(),
            },
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            "9:00 AM".into(),
            PaymentMethod::Card,
        )
    }

    #[test]
    fn test_hash_data() {
        assert_eq!(
            hash_data(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_booking_receipt_digest_tracks_content() {
        let receipt = BookingReceipt::from(&booking());
        let digest = receipt.digest().unwrap();
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, receipt.clone().digest().unwrap());

        let mut tampered = receipt.clone();
        tampered.amount = "$0.00".into();
        assert_ne!(digest, tampered.digest().unwrap());
    }

    #[test]
    fn test_booking_receipt_render() {
        let receipt = BookingReceipt::from(&booking());
        let text = receipt.render().unwrap();
        assert!(text.contains(&format!("Booking #{}", receipt.booking_id)));
        assert!(text.contains("Dr. Raj Menon (Thoracic Surgeon)"));
        assert!(text.contains("Monday, March 2, 2026"));
        assert!(text.contains("$160.00"));
        assert!(text.ends_with(&format!("Verification   {}\n", receipt.digest().unwrap())));
        assert_eq!(receipt.file_name(), "Booking-Confirmation-Asha-Nair.txt");
    }

    #[test]
    fn test_medical_report_from_prediction() {
        let prediction = PredictionResult::from_value(serde_json::json!({
            "prediction": "Medium",
            "confidence": 76.4,
            "diet": {"plain_text": "DIET: Limit red meat & soda."},
            "recommendations": ["Wear N95 masks"]
        }))
        .unwrap();
        let patient = PatientRecord {
            name: "Ravi".into(),
            is_smoker: true,
            ..Default::default()
        };
        let report = MedicalReport::from_prediction(&patient, &prediction);
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert_eq!(report.risk_score, 76);
        assert_eq!(report.doctor_note, "DIET: Limit red meat & soda.");
        assert!(report.consultation_id.starts_with("LV-"));
        assert_eq!(report.consultation_id.len(), 11);

        let text = report.render().unwrap();
        assert!(text.contains("Risk Level     Medium"));
        assert!(text.contains("Yes, 1 yrs, intensity 1/9"));
    }
}
