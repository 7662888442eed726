//! LungVision Core Library
//!
//! Patient intake, risk screening and specialist booking for the LungVision
//! lung-cancer screening service. Everything here is synchronous and free of
//! I/O; the HTTP client lives in `lungvision-client`.
//!
//! # Architecture
//!
//! ```text
//!   Intro ──skip / finish──▶ Wizard (steps 1-5: questionnaire)
//!                               │
//!                               ▼
//!                     Step 6: Analysis ──POST /predict──▶ prediction service
//!                               │                                │
//!                      [AnalysisGuard: one request per entry]    │
//!                               │◀───────────────────────────────┘
//!                               ▼
//!                            Results ──▶ MedicalReport (sha256 digest)
//!                             │   ▲
//!                 open_booking│   │close / back
//!                             ▼   │
//!                            Booking: Doctors → Schedule → Payment → Success
//!                                                                    │
//!                                                       BookingReceipt (sha256)
//! ```
//!
//! # Core Principle
//!
//! **The prediction service is authoritative.** The client-side [`risk`]
//! heuristic is an informational estimate and never drives the results screen.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, PredictionResult, Doctor, etc.)
//! - [`store`]: Owner of the in-progress patient record
//! - [`risk`]: Client-side weighted risk heuristic
//! - [`wizard`]: Questionnaire steps, titles and visual themes
//! - [`analysis`]: One-shot submission guard and progress bar
//! - [`intro`]: Timed intro script
//! - [`flow`]: Top-level screen transitions
//! - [`booking`]: Specialist booking sub-flow
//! - [`receipt`]: Printable receipts and reports
//! - [`session`]: All of the above for one intake session

pub mod analysis;
pub mod booking;
pub mod flow;
pub mod intro;
pub mod models;
pub mod receipt;
pub mod risk;
pub mod session;
pub mod store;
pub mod wizard;

// Re-export commonly used types
pub use analysis::{AnalysisGuard, AnalysisStatus, ProgressIndicator};
pub use booking::{BookingBack, BookingError, BookingFlow, BookingStage, TIME_SLOTS};
pub use flow::{FlowController, FlowError, Screen};
pub use intro::{Clock, Intro, IntroPhase, ManualClock, SystemClock, INTRO_SCRIPT};
pub use models::{
    BookingConfirmation, BookingRecord, BookingRequest, Doctor, Field, FieldKind, Gender,
    HospitalRecord, PatientRecord, PaymentMethod, PredictionError, PredictionResult,
    RegistryEntry, RiskLevel,
};
pub use receipt::{BookingReceipt, MedicalReport, ReceiptError, ReceiptResult};
pub use risk::{calculate_risk, RiskAssessment};
pub use session::{Session, SessionError, SessionResult, Theme};
pub use store::{Answer, PatientError, PatientStore, PatientUpdate};
pub use wizard::{Backdrop, StepTheme, Wizard, WizardStep};
