//! HTTP client tests against a stub service.

use std::collections::HashMap;
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use lungvision_client::{ApiClient, ApiError, ClientConfig};
use lungvision_core::models::{PatientRecord, PredictionError, RiskLevel};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral port; returns the API base URL.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn client(base_url: &str, timeout: Duration) -> ApiClient {
    let config = ClientConfig::new(base_url).unwrap().with_timeout(timeout);
    ApiClient::new(&config).unwrap()
}

fn prediction_body() -> Value {
    json!({
        "prediction": "High",
        "confidence": 97.3,
        "diet": {
            "color": "#ef4444",
            "bg": "rgba(239,68,68,0.1)",
            "title": "High Risk Protocol",
            "content": "Avoid processed meat.<br>Increase antioxidants.",
            "plain_text": "Avoid processed meat. Increase antioxidants."
        },
        "recommendations": ["Consult an oncologist immediately"],
        "plot_url": "data:image/png;base64,AAAA",
        "dashboard": {
            "radar": {"labels": ["Smoking", "Genetics"], "data": [8, 6]},
            "bar": {"labels": ["Air Pollution"], "data": [0.42]},
            "base_value": 0.33
        }
    })
}

fn doctor(id: u32, specialty: &str) -> Value {
    json!({
        "ID": id,
        "Name": format!("Dr. {id}"),
        "Specialty": specialty,
        "Hospital": "City Hospital",
        "Location": "Pune",
        "Rating": 4.5,
        "ImageURL": "https://example.org/doc.png"
    })
}

#[tokio::test]
async fn test_predict_success() {
    let app = Router::new().route(
        "/api/predict",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["isSmoker"], json!(false));
            assert_eq!(body["balancedDiet"], json!(5));
            Json(prediction_body())
        }),
    );
    let base = serve(app).await;

    let result = client(&base, Duration::from_secs(5))
        .predict(&PatientRecord::default())
        .await
        .unwrap();
    assert_eq!(result.prediction, RiskLevel::High);
    assert_eq!(result.confidence_percent(), 97);
    assert_eq!(result.dashboard.radar.labels, vec!["Smoking", "Genetics"]);
    assert!(result.plot().is_some());
}

#[tokio::test]
async fn test_predict_timeout() {
    let app = Router::new().route(
        "/api/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(prediction_body())
        }),
    );
    let base = serve(app).await;

    let err = client(&base, Duration::from_millis(200))
        .predict(&PatientRecord::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Timeout), "got {err:?}");
    assert_eq!(err.to_string(), "Request timed out. Please try again.");
}

#[tokio::test]
async fn test_unreachable_host() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/api"), Duration::from_secs(5))
        .predict(&PatientRecord::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unreachable { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_server_error_surfaces_body() {
    let app = Router::new().route(
        "/api/predict",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
    );
    let base = serve(app).await;

    let err = client(&base, Duration::from_secs(5))
        .predict(&PatientRecord::default())
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_prediction_field() {
    let app = Router::new().route(
        "/api/predict",
        post(|| async { Json(json!({"confidence": 50.0})) }),
    );
    let base = serve(app).await;

    let err = client(&base, Duration::from_secs(5))
        .predict(&PatientRecord::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Prediction(PredictionError::MissingField("prediction"))
    ));
}

#[tokio::test]
async fn test_doctors_filter() {
    let app = Router::new().route(
        "/api/doctors",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            let all = vec![
                doctor(1, "Oncologist"),
                doctor(2, "Pulmonologist"),
                doctor(3, "Thoracic Surgeon"),
            ];
            let filtered: Vec<Value> = match params.get("risk").map(String::as_str) {
                Some("High") => all
                    .into_iter()
                    .filter(|d| d["Specialty"] != "Pulmonologist")
                    .collect(),
                _ => all,
            };
            Json(filtered)
        }),
    );
    let base = serve(app).await;
    let api = client(&base, Duration::from_secs(5));

    assert_eq!(api.doctors(None).await.unwrap().len(), 3);
    let high = api.doctors(Some(RiskLevel::High)).await.unwrap();
    assert_eq!(high.len(), 2);
    assert!(high
        .iter()
        .all(|d| RiskLevel::High.recommended_specialties().contains(&d.specialty.as_str())));
}

#[tokio::test]
async fn test_chat_book_and_records() {
    let app = Router::new()
        .route(
            "/api/chat",
            post(|Json(body): Json<Value>| async move {
                let message = body["message"].as_str().unwrap_or_default().to_lowercase();
                let response = if message.contains("fee") {
                    "The consultation booking fee is ₹500."
                } else {
                    "I can help with Symptoms, Risks, or Booking. What would you like to know?"
                };
                Json(json!({ "response": response }))
            }),
        )
        .route(
            "/api/book",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["paymentMethod"], "upi");
                Json(json!({"success": true, "transactionId": "TXN-48213"}))
            }),
        )
        .route(
            "/api/registry",
            get(|| async {
                Json(json!([{
                    "Timestamp": "2026-03-01 10:00:00",
                    "Patient Name": "Asha",
                    "Diagnosis": "Low",
                    "Confidence Score": "88.1%",
                    "Air Pollution": 3
                }]))
            }),
        )
        .route(
            "/api/hospital-records",
            get(|| async {
                Json(json!([{
                    "Transaction ID": "TXN-48213",
                    "Payment Status": "Payment Successful",
                    "Fee Paid": "$160.00",
                    "Payment Method": null
                }]))
            }),
        )
        .route(
            "/api/health",
            get(|| async {
                Json(json!({"status": "ok", "model_loaded": true, "timestamp": "2026-03-01T10:00:00"}))
            }),
        );
    let base = serve(app).await;
    let api = client(&base, Duration::from_secs(5));

    assert_eq!(
        api.chat("What is the FEE?").await.unwrap(),
        "The consultation booking fee is ₹500."
    );

    let prediction = lungvision_core::PredictionResult::from_value(prediction_body()).unwrap();
    let record = lungvision_core::BookingRecord::new(
        "Asha".into(),
        serde_json::from_value(doctor(1, "Oncologist")).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        "9:00 AM".into(),
        lungvision_core::PaymentMethod::Upi,
    );
    let confirmation = api.book(&record.to_request(&prediction)).await.unwrap();
    assert_eq!(confirmation.transaction_id, "TXN-48213");

    let registry = api.registry().await.unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0].patient_name.as_deref(), Some("Asha"));
    assert!(registry[0].features.contains_key("Air Pollution"));

    let records = api.hospital_records().await.unwrap();
    assert_eq!(records[0].transaction_id.as_deref(), Some("TXN-48213"));
    assert!(records[0].payment_method.is_none());

    let health = api.health().await.unwrap();
    assert!(health.model_loaded);
}

#[tokio::test]
async fn test_registry_error_is_reported() {
    let app = Router::new().route(
        "/api/registry",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "csv unreadable") }),
    );
    let base = serve(app).await;

    let err = client(&base, Duration::from_secs(5))
        .registry()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}
