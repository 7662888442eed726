//! Drives the analysis step against a prediction backend.

use std::time::Duration;

use async_trait::async_trait;
use lungvision_core::analysis::{COMPLETION_DELAY, PROGRESS_TICK};
use lungvision_core::models::{PatientRecord, PredictionResult};
use lungvision_core::{Session, SessionResult};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ApiResult;

/// Anything that can turn a patient record into a prediction.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, record: &PatientRecord) -> ApiResult<PredictionResult>;
}

#[async_trait]
impl Predictor for ApiClient {
    async fn predict(&self, record: &PatientRecord) -> ApiResult<PredictionResult> {
        ApiClient::predict(self, record).await
    }
}

/// Timing of the progress animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub tick: Duration,
    pub completion_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            tick: PROGRESS_TICK,
            completion_delay: COMPLETION_DELAY,
        }
    }
}

impl Pacing {
    /// No visible animation.
    pub fn immediate() -> Self {
        Self {
            tick: Duration::from_millis(1),
            completion_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// A request was already issued for this wizard entry
    AlreadyStarted,
    /// The session is now on the results screen
    Completed,
    /// The session stays on the analysis step
    Failed {
        /// User-facing error
        message: String,
        /// Whether re-issuing the same request may succeed
        retryable: bool,
    },
}

/// The user's choice after a failed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Retry,
    /// Return to the previous wizard step, keeping the answers
    Back,
    Quit,
}

impl Recovery {
    pub fn prompt(retryable: bool) -> &'static str {
        if retryable {
            "[r]etry, [b]ack to the questionnaire, [q]uit:"
        } else {
            "[b]ack to the questionnaire, [q]uit:"
        }
    }

    /// Parse a menu answer. Retry is only accepted when `retryable`.
    pub fn parse(input: &str, retryable: bool) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "r" | "retry" if retryable => Some(Recovery::Retry),
            "b" | "back" => Some(Recovery::Back),
            "q" | "quit" => Some(Recovery::Quit),
            _ => None,
        }
    }
}

/// First submission on entering the analysis step.
pub async fn run_analysis<P, F>(
    session: &mut Session,
    predictor: &P,
    pacing: Pacing,
    on_progress: F,
) -> SessionResult<AnalysisOutcome>
where
    P: Predictor + ?Sized,
    F: FnMut(u8),
{
    match session.begin_analysis()? {
        Some(record) => drive(session, predictor, record, pacing, on_progress).await,
        None => Ok(AnalysisOutcome::AlreadyStarted),
    }
}

/// "Try Again" after a failure.
pub async fn retry_analysis<P, F>(
    session: &mut Session,
    predictor: &P,
    pacing: Pacing,
    on_progress: F,
) -> SessionResult<AnalysisOutcome>
where
    P: Predictor + ?Sized,
    F: FnMut(u8),
{
    match session.retry_analysis()? {
        Some(record) => drive(session, predictor, record, pacing, on_progress).await,
        None => Ok(AnalysisOutcome::AlreadyStarted),
    }
}

async fn drive<P, F>(
    session: &mut Session,
    predictor: &P,
    record: PatientRecord,
    pacing: Pacing,
    mut on_progress: F,
) -> SessionResult<AnalysisOutcome>
where
    P: Predictor + ?Sized,
    F: FnMut(u8),
{
    let request = predictor.predict(&record);
    tokio::pin!(request);
    let mut ticker = tokio::time::interval(pacing.tick);

    let result = loop {
        tokio::select! {
            result = &mut request => break result,
            _ = ticker.tick() => on_progress(session.progress_mut().tick()),
        }
    };

    match result {
        Ok(prediction) => {
            session.progress_mut().complete();
            on_progress(100);
            tokio::time::sleep(pacing.completion_delay).await;
            session.complete_analysis(Ok(prediction))?;
            info!("Analysis complete");
            Ok(AnalysisOutcome::Completed)
        }
        Err(err) => {
            warn!(error = %err, "Prediction failed");
            let message = err.to_string();
            session.complete_analysis(Err(message.clone()))?;
            Ok(AnalysisOutcome::Failed {
                message,
                retryable: err.is_transient(),
            })
        }
    }
}
