//! Six-step intake wizard.

use serde::{Deserialize, Serialize};

use crate::models::{Field, PatientRecord};

/// One screen of the questionnaire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    Identity = 1,
    Lifestyle = 2,
    Respiratory = 3,
    Systemic = 4,
    Environment = 5,
    Analysis = 6,
}

impl WizardStep {
    pub const FIRST: WizardStep = WizardStep::Identity;
    pub const LAST: WizardStep = WizardStep::Analysis;
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Identity,
        WizardStep::Lifestyle,
        WizardStep::Respiratory,
        WizardStep::Systemic,
        WizardStep::Environment,
        WizardStep::Analysis,
    ];

    /// 1-based position.
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Identity => "Patient Info",
            WizardStep::Lifestyle => "Lifestyle",
            WizardStep::Respiratory => "Respiratory",
            WizardStep::Systemic => "Systemic",
            WizardStep::Environment => "Environment",
            WizardStep::Analysis => "Analysis",
        }
    }

    fn successor(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn predecessor(self) -> Option<Self> {
        Self::from_number(self.number().checked_sub(1)?)
    }

    /// Questions shown on this step. Smoking history is only asked of smokers.
    pub fn fields(self, record: &PatientRecord) -> Vec<Field> {
        match self {
            WizardStep::Identity => vec![Field::Name, Field::Age, Field::Gender],
            WizardStep::Lifestyle => {
                let mut fields = vec![Field::IsSmoker];
                if record.is_smoker {
                    fields.extend([Field::YearsOfSmoking, Field::SmokingIntensity]);
                }
                fields.extend([
                    Field::PassiveSmokingLevel,
                    Field::AlcoholUse,
                    Field::ObesityLevel,
                    Field::BalancedDiet,
                ]);
                fields
            }
            WizardStep::Respiratory => vec![
                Field::CoughingBlood,
                Field::Wheezing,
                Field::ShortnessOfBreath,
                Field::SwallowingDifficulty,
                Field::DryCough,
                Field::ChestPain,
                Field::Snoring,
            ],
            WizardStep::Systemic => vec![
                Field::Fatigue,
                Field::WeightLoss,
                Field::ClubbingFingers,
                Field::FrequentColds,
            ],
            WizardStep::Environment => vec![
                Field::AirPollution,
                Field::OccupationalHazards,
                Field::DustAllergy,
                Field::GeneticRisk,
                Field::ChronicLungDisease,
            ],
            WizardStep::Analysis => Vec::new(),
        }
    }

    /// Background treatment for this step.
    pub fn theme(self, record: &PatientRecord) -> StepTheme {
        let backdrop = match self {
            WizardStep::Identity => Backdrop::Clinical,
            WizardStep::Lifestyle if record.is_smoker => Backdrop::Smoke {
                opacity: 0.1 + f64::from(record.smoking_intensity) * 0.02,
            },
            WizardStep::Lifestyle => Backdrop::Clear,
            WizardStep::Respiratory => Backdrop::Breath,
            WizardStep::Systemic => Backdrop::Circulation,
            WizardStep::Environment => Backdrop::Atmosphere,
            WizardStep::Analysis => Backdrop::Scanning,
        };
        let particle_count = match backdrop {
            Backdrop::Smoke { .. } => u32::from(record.smoking_intensity) * 3 + 10,
            _ => 15,
        };
        StepTheme {
            backdrop,
            particle_count,
        }
    }
}

/// Visual atmosphere behind a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backdrop {
    Clinical,
    Clear,
    /// Smoker on the lifestyle page; denser with intensity
    Smoke { opacity: f64 },
    Breath,
    Circulation,
    Atmosphere,
    Scanning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepTheme {
    pub backdrop: Backdrop,
    pub particle_count: u32,
}

/// Linear forward/back navigation over [`WizardStep`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wizard {
    step: WizardStep,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            step: WizardStep::FIRST,
        }
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_first(&self) -> bool {
        self.step == WizardStep::FIRST
    }

    pub fn is_analysis(&self) -> bool {
        self.step == WizardStep::LAST
    }

    /// Advance one step. No-op on the analysis step; returns whether it moved.
    pub fn next(&mut self) -> bool {
        match self.step.successor() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Go back one step. No-op on the first step; returns whether it moved.
    pub fn back(&mut self) -> bool {
        match self.step.predecessor() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.step = WizardStep::FIRST;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let mut wizard = Wizard::new();
        assert!(!wizard.back());
        assert_eq!(wizard.step(), WizardStep::Identity);

        for expected in 2..=6 {
            assert!(wizard.next());
            assert_eq!(wizard.step().number(), expected);
        }
        assert!(wizard.is_analysis());
        assert!(!wizard.next());
        assert_eq!(wizard.step(), WizardStep::Analysis);

        assert!(wizard.back());
        assert_eq!(wizard.step(), WizardStep::Environment);
        wizard.reset();
        assert!(wizard.is_first());
    }

    #[test]
    fn test_from_number() {
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(3), Some(WizardStep::Respiratory));
        assert_eq!(WizardStep::from_number(7), None);
    }

    #[test]
    fn test_lifestyle_fields_depend_on_smoking() {
        let mut record = PatientRecord::default();
        assert!(!WizardStep::Lifestyle
            .fields(&record)
            .contains(&Field::YearsOfSmoking));
        record.is_smoker = true;
        let fields = WizardStep::Lifestyle.fields(&record);
        assert_eq!(fields[1], Field::YearsOfSmoking);
        assert_eq!(fields[2], Field::SmokingIntensity);
        assert!(WizardStep::Analysis.fields(&record).is_empty());
    }

    #[test]
    fn test_lifestyle_theme() {
        let mut record = PatientRecord::default();
        let theme = WizardStep::Lifestyle.theme(&record);
        assert_eq!(theme.backdrop, Backdrop::Clear);
        assert_eq!(theme.particle_count, 15);

        record.is_smoker = true;
        record.smoking_intensity = 7;
        let theme = WizardStep::Lifestyle.theme(&record);
        assert_eq!(theme.particle_count, 31);
        assert!(matches!(theme.backdrop, Backdrop::Smoke { opacity } if (opacity - 0.24).abs() < 1e-9));

        assert_eq!(WizardStep::Analysis.theme(&record).backdrop, Backdrop::Scanning);
    }
}
