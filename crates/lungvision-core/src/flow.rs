//! Top-level screen sequencing: Intro → Wizard → Results ⇄ Booking.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Screen {
    Intro,
    Wizard,
    Results,
    Booking,
}

/// Flow errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: Screen, to: Screen },

    #[error("No prediction available for this patient")]
    MissingPrediction,

    #[error("Analysis can only run on the analysis step")]
    NotOnAnalysisStep,

    #[error("No prediction request is in flight")]
    NoRequestInFlight,
}

pub type FlowResult<T> = Result<T, FlowError>;

/// Whether `from → to` is one of the permitted edges.
pub fn is_allowed(from: Screen, to: Screen) -> bool {
    use Screen::*;
    matches!(
        (from, to),
        (Intro, Wizard) | (Wizard, Results) | (Results, Booking) | (Booking, Results) | (Results, Wizard)
    )
}

/// Current screen plus the transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowController {
    screen: Screen,
}

impl Default for FlowController {
    fn default() -> Self {
        Self {
            screen: Screen::Intro,
        }
    }
}

impl FlowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    fn go(&mut self, to: Screen) -> FlowResult<()> {
        if !is_allowed(self.screen, to) {
            return Err(FlowError::InvalidTransition {
                from: self.screen,
                to,
            });
        }
        self.screen = to;
        Ok(())
    }

    /// Intro skipped or played through.
    pub fn finish_intro(&mut self) -> FlowResult<()> {
        self.go(Screen::Wizard)
    }

    /// Prediction succeeded.
    pub fn show_results(&mut self) -> FlowResult<()> {
        self.go(Screen::Results)
    }

    pub fn open_booking(&mut self) -> FlowResult<()> {
        self.go(Screen::Booking)
    }

    pub fn close_booking(&mut self) -> FlowResult<()> {
        if self.screen != Screen::Booking {
            return Err(FlowError::InvalidTransition {
                from: self.screen,
                to: Screen::Results,
            });
        }
        self.go(Screen::Results)
    }

    /// Results → Wizard for a new patient. Caller clears patient state.
    pub fn new_patient(&mut self) -> FlowResult<()> {
        if self.screen != Screen::Results {
            return Err(FlowError::InvalidTransition {
                from: self.screen,
                to: Screen::Wizard,
            });
        }
        self.go(Screen::Wizard)
    }
}
