//! One intake session: the state shared by every screen.
//!
//! [`Session`] ties together the flow controller, the patient store, the
//! wizard, the analysis guard and the booking flow. It performs no I/O. The
//! caller sends the record returned by [`Session::begin_analysis`] to the
//! prediction service and reports the outcome with
//! [`Session::complete_analysis`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{AnalysisGuard, AnalysisStatus, ProgressIndicator};
use crate::booking::{BookingBack, BookingError, BookingFlow};
use crate::flow::{FlowController, FlowError, Screen};
use crate::models::{BookingRecord, Doctor, PatientRecord, PaymentMethod, PredictionResult};
use crate::receipt::{BookingReceipt, MedicalReport};
use crate::risk::{calculate_risk, RiskAssessment};
use crate::store::PatientStore;
use crate::wizard::{Wizard, WizardStep};

/// Session errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error("No booking in progress")]
    NoBooking,
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Display theme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    flow: FlowController,
    patients: PatientStore,
    theme: Theme,
    wizard: Wizard,
    analysis: AnalysisGuard,
    progress: ProgressIndicator,
    prediction: Option<PredictionResult>,
    booking: Option<BookingFlow>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.flow.screen()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn patients(&self) -> &PatientStore {
        &self.patients
    }

    pub fn patients_mut(&mut self) -> &mut PatientStore {
        &mut self.patients
    }

    pub fn record(&self) -> &PatientRecord {
        self.patients.record()
    }

    pub fn step(&self) -> WizardStep {
        self.wizard.step()
    }

    pub fn analysis_status(&self) -> &AnalysisStatus {
        self.analysis.status()
    }

    pub fn progress(&self) -> &ProgressIndicator {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressIndicator {
        &mut self.progress
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn booking(&self) -> Option<&BookingFlow> {
        self.booking.as_ref()
    }

    pub fn finish_intro(&mut self) -> SessionResult<()> {
        self.flow.finish_intro()?;
        Ok(())
    }

    /// Advance the wizard. Entering the analysis step re-arms the guard.
    pub fn next_step(&mut self) -> bool {
        if self.flow.screen() != Screen::Wizard || !self.wizard.next() {
            return false;
        }
        if self.wizard.is_analysis() {
            self.analysis.reset();
            self.progress.reset();
        }
        true
    }

    /// Go back one step. Refused while a prediction request is in flight.
    pub fn back_step(&mut self) -> bool {
        if self.flow.screen() != Screen::Wizard || self.analysis.is_loading() {
            return false;
        }
        self.wizard.back()
    }

    fn ensure_analysis_step(&self) -> SessionResult<()> {
        if self.flow.screen() != Screen::Wizard || !self.wizard.is_analysis() {
            return Err(FlowError::NotOnAnalysisStep.into());
        }
        Ok(())
    }

    /// Claim the one submission for this wizard entry.
    ///
    /// Returns the record snapshot to submit, or `None` when a request was
    /// already issued.
    pub fn begin_analysis(&mut self) -> SessionResult<Option<PatientRecord>> {
        self.ensure_analysis_step()?;
        if !self.analysis.begin() {
            return Ok(None);
        }
        self.progress.reset();
        Ok(Some(self.patients.record().clone()))
    }

    /// "Try Again" after a failed request.
    pub fn retry_analysis(&mut self) -> SessionResult<Option<PatientRecord>> {
        self.ensure_analysis_step()?;
        if !self.analysis.retry() {
            return Ok(None);
        }
        self.progress.reset();
        Ok(Some(self.patients.record().clone()))
    }

    /// Record the outcome of the prediction request.
    ///
    /// Success stores the prediction and moves to the results screen. Failure
    /// keeps the wizard on the analysis step with the error message. Only the
    /// request claimed by `begin_analysis` or `retry_analysis` may complete.
    pub fn complete_analysis(
        &mut self,
        outcome: Result<PredictionResult, String>,
    ) -> SessionResult<()> {
        self.ensure_analysis_step()?;
        if !self.analysis.is_loading() {
            return Err(FlowError::NoRequestInFlight.into());
        }
        match outcome {
            Ok(prediction) => {
                self.flow.show_results()?;
                self.analysis.succeed();
                self.progress.complete();
                self.prediction = Some(prediction);
            }
            Err(message) => {
                self.analysis.fail(message);
            }
        }
        Ok(())
    }

    /// Client-side estimate for the current record.
    pub fn local_assessment(&self) -> RiskAssessment {
        calculate_risk(self.patients.record())
    }

    pub fn medical_report(&self) -> SessionResult<MedicalReport> {
        let prediction = self.prediction.as_ref().ok_or(FlowError::MissingPrediction)?;
        Ok(MedicalReport::from_prediction(self.patients.record(), prediction))
    }

    pub fn open_booking(&mut self) -> SessionResult<()> {
        if self.prediction.is_none() {
            return Err(FlowError::MissingPrediction.into());
        }
        self.flow.open_booking()?;
        self.booking = Some(BookingFlow::new());
        Ok(())
    }

    fn booking_mut(&mut self) -> SessionResult<&mut BookingFlow> {
        self.booking.as_mut().ok_or(SessionError::NoBooking)
    }

    pub fn select_doctor(&mut self, doctor: Doctor) -> SessionResult<()> {
        Ok(self.booking_mut()?.select_doctor(doctor)?)
    }

    pub fn schedule(&mut self, date: NaiveDate, slot: &str, today: NaiveDate) -> SessionResult<()> {
        let booking = self.booking_mut()?;
        booking.choose_date(date, today)?;
        booking.choose_time(slot)?;
        Ok(booking.confirm_schedule()?)
    }

    pub fn pay_booking(&mut self, method: PaymentMethod) -> SessionResult<BookingRecord> {
        let name = self.patients.record().display_name().to_string();
        let record = self.booking_mut()?.pay(method, &name)?;
        Ok(record.clone())
    }

    pub fn booking_receipt(&self) -> Option<BookingReceipt> {
        self.booking
            .as_ref()
            .and_then(BookingFlow::record)
            .map(BookingReceipt::from)
    }

    /// Back inside booking; leaving the doctor list returns to results.
    pub fn booking_back(&mut self) -> SessionResult<BookingBack> {
        let back = self.booking_mut()?.back();
        if back == BookingBack::Exit {
            self.close_booking()?;
        }
        Ok(back)
    }

    /// Return to results, from any booking stage.
    pub fn close_booking(&mut self) -> SessionResult<()> {
        self.flow.close_booking()?;
        self.booking = None;
        Ok(())
    }

    /// Results → wizard step 1 with a blank patient.
    pub fn new_patient(&mut self) -> SessionResult<()> {
        self.flow.new_patient()?;
        self.patients.reset();
        self.wizard.reset();
        self.analysis.reset();
        self.progress.reset();
        self.prediction = None;
        self.booking = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;

    fn prediction() -> PredictionResult {
        PredictionResult::from_value(serde_json::json!({
            "prediction": "High",
            "confidence": 91.2
        }))
        .unwrap()
    }

    fn at_analysis() -> Session {
        let mut session = Session::new();
        session.finish_intro().unwrap();
        while session.next_step() {}
        assert_eq!(session.step(), WizardStep::Analysis);
        session
    }

    #[test]
    fn test_wizard_ignored_outside_wizard_screen() {
        let mut session = Session::new();
        assert!(!session.next_step());
        assert_eq!(session.step(), WizardStep::Identity);
    }

    #[test]
    fn test_begin_analysis_once() {
        let mut session = at_analysis();
        assert!(session.begin_analysis().unwrap().is_some());
        assert!(session.begin_analysis().unwrap().is_none());
        assert!(!session.back_step());
    }

    #[test]
    fn test_begin_analysis_requires_step() {
        let mut session = Session::new();
        session.finish_intro().unwrap();
        assert_eq!(
            session.begin_analysis(),
            Err(SessionError::Flow(FlowError::NotOnAnalysisStep))
        );
    }

    #[test]
    fn test_failure_then_retry() {
        let mut session = at_analysis();
        session.begin_analysis().unwrap();
        session
            .complete_analysis(Err("Request timed out. Please try again.".into()))
            .unwrap();
        assert_eq!(session.screen(), Screen::Wizard);
        assert!(matches!(session.analysis_status(), AnalysisStatus::Failed(_)));

        assert!(session.retry_analysis().unwrap().is_some());
        session.complete_analysis(Ok(prediction())).unwrap();
        assert_eq!(session.screen(), Screen::Results);
        assert!(session.progress().is_complete());
        assert_eq!(session.prediction().unwrap().prediction, RiskLevel::High);
    }

    #[test]
    fn test_success_without_request_rejected() {
        let mut session = at_analysis();
        assert_eq!(
            session.complete_analysis(Ok(prediction())),
            Err(SessionError::Flow(FlowError::NoRequestInFlight))
        );
        assert_eq!(session.screen(), Screen::Wizard);
        assert!(session.prediction().is_none());
        assert_eq!(session.analysis_status(), &AnalysisStatus::Idle);
    }

    #[test]
    fn test_failure_without_request_cannot_double_submit() {
        let mut session = at_analysis();
        assert_eq!(
            session.complete_analysis(Err("offline".into())),
            Err(SessionError::Flow(FlowError::NoRequestInFlight))
        );
        assert!(session.retry_analysis().unwrap().is_none());

        assert!(session.begin_analysis().unwrap().is_some());
        assert!(session.retry_analysis().unwrap().is_none());
        assert!(session.begin_analysis().unwrap().is_none());
    }

    #[test]
    fn test_second_outcome_rejected() {
        let mut session = at_analysis();
        session.begin_analysis().unwrap();
        session.complete_analysis(Err("offline".into())).unwrap();
        assert_eq!(
            session.complete_analysis(Ok(prediction())),
            Err(SessionError::Flow(FlowError::NoRequestInFlight))
        );
        assert_eq!(session.screen(), Screen::Wizard);
    }

    #[test]
    fn test_reentering_analysis_rearms() {
        let mut session = at_analysis();
        session.begin_analysis().unwrap();
        session.complete_analysis(Err("offline".into())).unwrap();
        assert!(session.back_step());
        assert!(session.next_step());
        assert!(session.begin_analysis().unwrap().is_some());
    }

    #[test]
    fn test_booking_requires_prediction() {
        let mut session = Session::new();
        assert_eq!(
            session.open_booking(),
            Err(SessionError::Flow(FlowError::MissingPrediction))
        );
    }

    #[test]
    fn test_new_patient_clears_state() {
        let mut session = at_analysis();
        session.patients_mut().answer_str(crate::models::Field::Name, "Asha").unwrap();
        session.begin_analysis().unwrap();
        session.complete_analysis(Ok(prediction())).unwrap();
        session.open_booking().unwrap();
        assert_eq!(session.booking_back().unwrap(), BookingBack::Exit);
        assert_eq!(session.screen(), Screen::Results);

        session.new_patient().unwrap();
        assert_eq!(session.screen(), Screen::Wizard);
        assert_eq!(session.step(), WizardStep::Identity);
        assert!(session.prediction().is_none());
        assert_eq!(session.record(), &PatientRecord::default());
    }

    #[test]
    fn test_theme_toggle() {
        let mut session = Session::new();
        assert_eq!(session.theme(), Theme::Dark);
        assert_eq!(session.toggle_theme(), Theme::Light);
        assert_eq!(session.toggle_theme(), Theme::Dark);
    }
}
