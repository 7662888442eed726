//! HTTP client for the LungVision prediction service.

use std::time::Duration;

use lungvision_core::models::{
    BookingConfirmation, BookingRequest, Doctor, HospitalRecord, PatientRecord, PredictionResult,
    RegistryEntry, RiskLevel,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

/// Async client over the service's JSON endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    predict_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let http = Client::builder().build().map_err(ApiError::from_reqwest)?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            predict_timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send and reject non-2xx responses, keeping the body for the error.
    async fn send(&self, request: RequestBuilder, endpoint: &'static str) -> ApiResult<Response> {
        debug!(endpoint, "Sending request");
        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(endpoint, status = status.as_u16(), "Request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> ApiResult<T> {
        let response = self.send(self.http.get(self.url(path)), path).await?;
        response.json().await.map_err(ApiError::from_reqwest)
    }

    /// `POST /predict`. One attempt, aborted after the configured timeout.
    pub async fn predict(&self, record: &PatientRecord) -> ApiResult<PredictionResult> {
        let request = self
            .http
            .post(self.url("predict"))
            .timeout(self.predict_timeout)
            .json(record);
        let response = self.send(request, "predict").await?;
        let value: serde_json::Value = response.json().await.map_err(ApiError::from_reqwest)?;
        let prediction = PredictionResult::from_value(value)?;
        info!(
            level = %prediction.prediction,
            confidence = prediction.confidence,
            "Prediction received"
        );
        Ok(prediction)
    }

    /// `GET /doctors`, filtered to the specialties for `risk` when given.
    pub async fn doctors(&self, risk: Option<RiskLevel>) -> ApiResult<Vec<Doctor>> {
        let mut request = self.http.get(self.url("doctors"));
        if let Some(risk) = risk {
            request = request.query(&[("risk", risk.as_str())]);
        }
        let response = self.send(request, "doctors").await?;
        response.json().await.map_err(ApiError::from_reqwest)
    }

    /// `POST /chat`; returns the assistant's reply.
    pub async fn chat(&self, message: &str) -> ApiResult<String> {
        let request = self
            .http
            .post(self.url("chat"))
            .json(&ChatRequest { message });
        let response = self.send(request, "chat").await?;
        let reply: ChatResponse = response.json().await.map_err(ApiError::from_reqwest)?;
        Ok(reply.response)
    }

    /// `POST /book`; the server appends the hospital record.
    pub async fn book(&self, details: &BookingRequest) -> ApiResult<BookingConfirmation> {
        let request = self.http.post(self.url("book")).json(details);
        let response = self.send(request, "book").await?;
        let confirmation: BookingConfirmation =
            response.json().await.map_err(ApiError::from_reqwest)?;
        if !confirmation.success {
            return Err(ApiError::InvalidResponse("Booking was not accepted".into()));
        }
        info!(transaction_id = %confirmation.transaction_id, "Booking recorded");
        Ok(confirmation)
    }

    pub async fn registry(&self) -> ApiResult<Vec<RegistryEntry>> {
        self.get_json("registry").await
    }

    pub async fn hospital_records(&self) -> ApiResult<Vec<HospitalRecord>> {
        self.get_json("hospital-records").await
    }

    /// `GET /health`. Also wakes a sleeping hosted instance.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        self.get_json("health").await
    }
}
