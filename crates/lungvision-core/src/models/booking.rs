//! Booking records and the `/book` wire format.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::directory::Doctor;
use super::prediction::PredictionResult;

pub const CONSULTATION_FEE_CENTS: u32 = 15_000;
pub const PLATFORM_FEE_CENTS: u32 = 1_000;

/// Format an amount in cents as dollars, e.g. `$160.00`.
pub fn format_usd(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// How the patient paid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Upi,
    Qr,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Qr => "qr",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            "qr" => Ok(PaymentMethod::Qr),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// A confirmed appointment, kept only for the lifetime of the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    /// Nine uppercase alphanumerics
    pub booking_id: String,
    pub created_at: String,
    pub patient_name: String,
    pub doctor: Doctor,
    pub date: NaiveDate,
    pub time: String,
    pub payment_method: PaymentMethod,
    pub amount_cents: u32,
}

impl BookingRecord {
    pub fn new(
        patient_name: String,
        doctor: Doctor,
        date: NaiveDate,
        time: String,
        payment_method: PaymentMethod,
    ) -> Self {
        let booking_id = uuid::Uuid::new_v4().simple().to_string()[..9].to_uppercase();
        Self {
            booking_id,
            created_at: chrono::Utc::now().to_rfc3339(),
            patient_name,
            doctor,
            date,
            time,
            payment_method,
            amount_cents: CONSULTATION_FEE_CENTS + PLATFORM_FEE_CENTS,
        }
    }

    pub fn amount(&self) -> String {
        format_usd(self.amount_cents)
    }

    /// Long-form date, e.g. "Monday, March 2, 2026".
    pub fn long_date(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }

    /// Build the `/book` request body for this appointment.
    pub fn to_request(&self, prediction: &PredictionResult) -> BookingRequest {
        BookingRequest {
            patient_name: self.patient_name.clone(),
            diagnosis: prediction.prediction.as_str().to_string(),
            confidence: prediction.confidence,
            doctor_name: self.doctor.name.clone(),
            specialty: self.doctor.specialty.clone(),
            date: self.long_date(),
            time: self.time.clone(),
            amount: self.amount(),
            payment_method: self.payment_method.as_str().to_string(),
        }
    }
}

/// Body of `POST /book`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_name: String,
    pub diagnosis: String,
    pub confidence: f64,
    pub doctor_name: String,
    pub specialty: String,
    pub date: String,
    pub time: String,
    pub amount: String,
    pub payment_method: String,
}

/// Response of `POST /book`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub success: bool,
    #[serde(default)]
    pub transaction_id: String,
}
