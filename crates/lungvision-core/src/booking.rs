//! Specialist booking: doctor → schedule → payment → confirmation.

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

use crate::models::{BookingRecord, Doctor, PaymentMethod};

/// Bookable appointment slots.
pub const TIME_SLOTS: [&str; 6] = [
    "9:00 AM", "10:00 AM", "11:00 AM", "2:00 PM", "3:00 PM", "4:00 PM",
];

/// Booking errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("Action not available while {actual:?} (needs {expected:?})")]
    WrongStage {
        expected: BookingStage,
        actual: BookingStage,
    },

    #[error("{0} is in the past")]
    DateInPast(NaiveDate),

    #[error("Clinics are closed on Sundays ({0})")]
    ClosedOnSunday(NaiveDate),

    #[error("Unknown time slot: {0}")]
    UnknownSlot(String),

    #[error("Pick both a date and a time first")]
    ScheduleIncomplete,
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Sub-screen of the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStage {
    Doctors,
    Schedule,
    Payment,
    Success,
}

/// Where a back action leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingBack {
    /// Returned to the doctor list
    Doctors,
    /// Leave the booking screen altogether
    Exit,
    /// Confirmed bookings have no back action
    Unavailable,
}

/// Validate an appointment date against `today`.
pub fn validate_date(date: NaiveDate, today: NaiveDate) -> BookingResult<()> {
    if date < today {
        return Err(BookingError::DateInPast(date));
    }
    if date.weekday() == Weekday::Sun {
        return Err(BookingError::ClosedOnSunday(date));
    }
    Ok(())
}

/// Resolve user input to one of [`TIME_SLOTS`], ignoring case and spacing.
pub fn parse_slot(input: &str) -> BookingResult<&'static str> {
    let normalized: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    TIME_SLOTS
        .iter()
        .copied()
        .find(|slot| slot.replace(' ', "") == normalized)
        .ok_or_else(|| BookingError::UnknownSlot(input.trim().to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingFlow {
    stage: BookingStage,
    doctor: Option<Doctor>,
    date: Option<NaiveDate>,
    time: Option<&'static str>,
    record: Option<BookingRecord>,
}

impl Default for BookingFlow {
    fn default() -> Self {
        Self {
            stage: BookingStage::Doctors,
            doctor: None,
            date: None,
            time: None,
            record: None,
        }
    }
}

impl BookingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> BookingStage {
        self.stage
    }

    pub fn doctor(&self) -> Option<&Doctor> {
        self.doctor.as_ref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<&'static str> {
        self.time
    }

    /// The confirmed booking, once paid.
    pub fn record(&self) -> Option<&BookingRecord> {
        self.record.as_ref()
    }

    fn require_stage(&self, expected: BookingStage) -> BookingResult<()> {
        if self.stage != expected {
            return Err(BookingError::WrongStage {
                expected,
                actual: self.stage,
            });
        }
        Ok(())
    }

    pub fn select_doctor(&mut self, doctor: Doctor) -> BookingResult<()> {
        self.require_stage(BookingStage::Doctors)?;
        self.doctor = Some(doctor);
        self.stage = BookingStage::Schedule;
        Ok(())
    }

    pub fn choose_date(&mut self, date: NaiveDate, today: NaiveDate) -> BookingResult<()> {
        self.require_stage(BookingStage::Schedule)?;
        validate_date(date, today)?;
        self.date = Some(date);
        Ok(())
    }

    pub fn choose_time(&mut self, slot: &str) -> BookingResult<()> {
        self.require_stage(BookingStage::Schedule)?;
        self.time = Some(parse_slot(slot)?);
        Ok(())
    }

    /// Schedule → Payment once both date and time are set.
    pub fn confirm_schedule(&mut self) -> BookingResult<()> {
        self.require_stage(BookingStage::Schedule)?;
        if self.date.is_none() || self.time.is_none() {
            return Err(BookingError::ScheduleIncomplete);
        }
        self.stage = BookingStage::Payment;
        Ok(())
    }

    /// Payment → Success, producing the booking record.
    pub fn pay(&mut self, method: PaymentMethod, patient_name: &str) -> BookingResult<&BookingRecord> {
        self.require_stage(BookingStage::Payment)?;
        let (Some(doctor), Some(date), Some(time)) = (self.doctor.clone(), self.date, self.time)
        else {
            return Err(BookingError::ScheduleIncomplete);
        };
        let record = BookingRecord::new(
            patient_name.to_string(),
            doctor,
            date,
            time.to_string(),
            method,
        );
        self.stage = BookingStage::Success;
        Ok(&*self.record.insert(record))
    }

    pub fn back(&mut self) -> BookingBack {
        match self.stage {
            BookingStage::Doctors => BookingBack::Exit,
            BookingStage::Schedule | BookingStage::Payment => {
                self.stage = BookingStage::Doctors;
                BookingBack::Doctors
            }
            BookingStage::Success => BookingBack::Unavailable,
        }
    }
}
