//! Patient questionnaire record.

use serde::{Deserialize, Serialize};

/// Lower bound for symptom and exposure ratings.
pub const SEVERITY_MIN: u8 = 1;
/// Upper bound for every rating.
pub const SEVERITY_MAX: u8 = 9;
/// Passive smoking is the only rating that may be zero.
pub const PASSIVE_SMOKING_MIN: u8 = 0;
pub const AGE_MIN: u8 = 1;
pub const AGE_MAX: u8 = 100;

/// Patient gender as captured on the identity page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// Nothing selected yet
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl Gender {
    /// Parse user input ("m", "male", "F", ...).
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "m" | "male" => Some(Gender::Male),
            "f" | "female" => Some(Gender::Female),
            "" => Some(Gender::Unspecified),
            _ => None,
        }
    }
}

/// Flat record of questionnaire answers.
///
/// The JSON form uses the camelCase keys expected by the prediction
/// service and is posted verbatim to `/predict`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientRecord {
    // Page 1: identity
    pub name: String,
    pub age: u8,
    pub gender: Gender,

    // Page 2: lifestyle
    pub is_smoker: bool,
    pub years_of_smoking: u8,
    pub smoking_intensity: u8,
    pub passive_smoking_level: u8,
    pub alcohol_use: u8,
    pub obesity_level: u8,
    pub balanced_diet: u8,

    // Page 3: respiratory
    pub coughing_blood: u8,
    pub wheezing: u8,
    pub shortness_of_breath: u8,
    pub swallowing_difficulty: u8,
    pub dry_cough: u8,
    pub chest_pain: u8,
    pub snoring: u8,

    // Page 4: systemic
    pub fatigue: u8,
    pub weight_loss: u8,
    pub clubbing_fingers: u8,
    pub frequent_colds: u8,

    // Page 5: environment and history
    pub air_pollution: u8,
    pub occupational_hazards: u8,
    pub dust_allergy: u8,
    pub genetic_risk: bool,
    pub chronic_lung_disease: bool,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 30,
            gender: Gender::Unspecified,
            is_smoker: false,
            years_of_smoking: 1,
            smoking_intensity: 1,
            passive_smoking_level: 0,
            alcohol_use: 1,
            obesity_level: 1,
            balanced_diet: 5,
            coughing_blood: 1,
            wheezing: 1,
            shortness_of_breath: 1,
            swallowing_difficulty: 1,
            dry_cough: 1,
            chest_pain: 1,
            snoring: 1,
            fatigue: 1,
            weight_loss: 1,
            clubbing_fingers: 1,
            frequent_colds: 1,
            air_pollution: 1,
            occupational_hazards: 1,
            dust_allergy: 1,
            genetic_risk: false,
            chronic_lung_disease: false,
        }
    }
}

fn saturate_u8(number: f64) -> u8 {
    // `as` saturates and maps NaN to 0
    number.round() as u8
}

impl PatientRecord {
    /// Parse a record from JSON, clamping every rating into range.
    ///
    /// Numbers outside `u8` (negative, fractional or above 255) saturate
    /// before the per-field clamp, so `"wheezing": 300` reads as 9.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(object) = value.as_object_mut() {
            for entry in object.values_mut() {
                if let Some(number) = entry.as_f64() {
                    *entry = saturate_u8(number).into();
                }
            }
        }
        let record: PatientRecord = serde_json::from_value(value)?;
        Ok(record.clamped())
    }

    /// Return a copy with all numeric fields forced into their ranges.
    pub fn clamped(mut self) -> Self {
        for field in Field::ALL {
            if let Some(value) = self.rating(field) {
                self.set_rating(field, value);
            }
        }
        self
    }

    /// Display name, falling back to a placeholder when none was entered.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Valued Patient"
        } else {
            self.name.trim()
        }
    }

    /// Read a numeric field. `None` for text, choice and toggle fields.
    pub fn rating(&self, field: Field) -> Option<u8> {
        let value = match field {
            Field::Age => self.age,
            Field::YearsOfSmoking => self.years_of_smoking,
            Field::SmokingIntensity => self.smoking_intensity,
            Field::PassiveSmokingLevel => self.passive_smoking_level,
            Field::AlcoholUse => self.alcohol_use,
            Field::ObesityLevel => self.obesity_level,
            Field::BalancedDiet => self.balanced_diet,
            Field::CoughingBlood => self.coughing_blood,
            Field::Wheezing => self.wheezing,
            Field::ShortnessOfBreath => self.shortness_of_breath,
            Field::SwallowingDifficulty => self.swallowing_difficulty,
            Field::DryCough => self.dry_cough,
            Field::ChestPain => self.chest_pain,
            Field::Snoring => self.snoring,
            Field::Fatigue => self.fatigue,
            Field::WeightLoss => self.weight_loss,
            Field::ClubbingFingers => self.clubbing_fingers,
            Field::FrequentColds => self.frequent_colds,
            Field::AirPollution => self.air_pollution,
            Field::OccupationalHazards => self.occupational_hazards,
            Field::DustAllergy => self.dust_allergy,
            Field::Name
            | Field::Gender
            | Field::IsSmoker
            | Field::GeneticRisk
            | Field::ChronicLungDisease => return None,
        };
        Some(value)
    }

    /// Write a numeric field, clamped to the field's range.
    /// Returns false for fields that are not numeric.
    pub fn set_rating(&mut self, field: Field, value: u8) -> bool {
        let Some((min, max)) = field.range() else {
            return false;
        };
        let value = value.clamp(min, max);
        let slot = match field {
            Field::Age => &mut self.age,
            Field::YearsOfSmoking => &mut self.years_of_smoking,
            Field::SmokingIntensity => &mut self.smoking_intensity,
            Field::PassiveSmokingLevel => &mut self.passive_smoking_level,
            Field::AlcoholUse => &mut self.alcohol_use,
            Field::ObesityLevel => &mut self.obesity_level,
            Field::BalancedDiet => &mut self.balanced_diet,
            Field::CoughingBlood => &mut self.coughing_blood,
            Field::Wheezing => &mut self.wheezing,
            Field::ShortnessOfBreath => &mut self.shortness_of_breath,
            Field::SwallowingDifficulty => &mut self.swallowing_difficulty,
            Field::DryCough => &mut self.dry_cough,
            Field::ChestPain => &mut self.chest_pain,
            Field::Snoring => &mut self.snoring,
            Field::Fatigue => &mut self.fatigue,
            Field::WeightLoss => &mut self.weight_loss,
            Field::ClubbingFingers => &mut self.clubbing_fingers,
            Field::FrequentColds => &mut self.frequent_colds,
            Field::AirPollution => &mut self.air_pollution,
            Field::OccupationalHazards => &mut self.occupational_hazards,
            Field::DustAllergy => &mut self.dust_allergy,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Read a yes/no field.
    pub fn flag(&self, field: Field) -> Option<bool> {
        match field {
            Field::IsSmoker => Some(self.is_smoker),
            Field::GeneticRisk => Some(self.genetic_risk),
            Field::ChronicLungDisease => Some(self.chronic_lung_disease),
            _ => None,
        }
    }

    /// Write a yes/no field. Returns false for other field kinds.
    pub fn set_flag(&mut self, field: Field, value: bool) -> bool {
        let slot = match field {
            Field::IsSmoker => &mut self.is_smoker,
            Field::GeneticRisk => &mut self.genetic_risk,
            Field::ChronicLungDisease => &mut self.chronic_lung_disease,
            _ => return false,
        };
        *slot = value;
        true
    }
}

/// How a questionnaire field is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Choice,
    Toggle,
    /// Inclusive numeric range
    Rating { min: u8, max: u8 },
}

/// Every answerable field of [`PatientRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Age,
    Gender,
    IsSmoker,
    YearsOfSmoking,
    SmokingIntensity,
    PassiveSmokingLevel,
    AlcoholUse,
    ObesityLevel,
    BalancedDiet,
    CoughingBlood,
    Wheezing,
    ShortnessOfBreath,
    SwallowingDifficulty,
    DryCough,
    ChestPain,
    Snoring,
    Fatigue,
    WeightLoss,
    ClubbingFingers,
    FrequentColds,
    AirPollution,
    OccupationalHazards,
    DustAllergy,
    GeneticRisk,
    ChronicLungDisease,
}

impl Field {
    pub const ALL: [Field; 26] = [
        Field::Name,
        Field::Age,
        Field::Gender,
        Field::IsSmoker,
        Field::YearsOfSmoking,
        Field::SmokingIntensity,
        Field::PassiveSmokingLevel,
        Field::AlcoholUse,
        Field::ObesityLevel,
        Field::BalancedDiet,
        Field::CoughingBlood,
        Field::Wheezing,
        Field::ShortnessOfBreath,
        Field::SwallowingDifficulty,
        Field::DryCough,
        Field::ChestPain,
        Field::Snoring,
        Field::Fatigue,
        Field::WeightLoss,
        Field::ClubbingFingers,
        Field::FrequentColds,
        Field::AirPollution,
        Field::OccupationalHazards,
        Field::DustAllergy,
        Field::GeneticRisk,
        Field::ChronicLungDisease,
    ];

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Name => FieldKind::Text,
            Field::Gender => FieldKind::Choice,
            Field::IsSmoker | Field::GeneticRisk | Field::ChronicLungDisease => FieldKind::Toggle,
            _ => match self.range() {
                Some((min, max)) => FieldKind::Rating { min, max },
                None => FieldKind::Text,
            },
        }
    }

    /// Inclusive bounds for numeric fields.
    pub fn range(self) -> Option<(u8, u8)> {
        match self {
            Field::Name
            | Field::Gender
            | Field::IsSmoker
            | Field::GeneticRisk
            | Field::ChronicLungDisease => None,
            Field::Age => Some((AGE_MIN, AGE_MAX)),
            Field::PassiveSmokingLevel => Some((PASSIVE_SMOKING_MIN, SEVERITY_MAX)),
            _ => Some((SEVERITY_MIN, SEVERITY_MAX)),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Patient Name",
            Field::Age => "Age",
            Field::Gender => "Gender",
            Field::IsSmoker => "Smoker",
            Field::YearsOfSmoking => "Years of Smoking",
            Field::SmokingIntensity => "Smoking Intensity",
            Field::PassiveSmokingLevel => "Passive Smoking",
            Field::AlcoholUse => "Alcohol Use",
            Field::ObesityLevel => "Obesity Level",
            Field::BalancedDiet => "Balanced Diet",
            Field::CoughingBlood => "Coughing of Blood",
            Field::Wheezing => "Wheezing",
            Field::ShortnessOfBreath => "Shortness of Breath",
            Field::SwallowingDifficulty => "Swallowing Difficulty",
            Field::DryCough => "Dry Cough",
            Field::ChestPain => "Chest Pain",
            Field::Snoring => "Snoring",
            Field::Fatigue => "Fatigue",
            Field::WeightLoss => "Weight Loss",
            Field::ClubbingFingers => "Clubbing of Finger Nails",
            Field::FrequentColds => "Frequent Colds",
            Field::AirPollution => "Air Pollution Exposure",
            Field::OccupationalHazards => "Occupational Hazards",
            Field::DustAllergy => "Dust Allergy",
            Field::GeneticRisk => "Genetic Risk (Family History)",
            Field::ChronicLungDisease => "Chronic Lung Disease",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Field::Name => "Enter your name",
            Field::Age => "1 to 100 years",
            Field::Gender => "male or female",
            Field::IsSmoker => "Do you currently smoke?",
            Field::YearsOfSmoking => "How many years have you been smoking?",
            Field::SmokingIntensity => "How heavily do you smoke? (1 = Light, 9 = Heavy)",
            Field::PassiveSmokingLevel => "Exposure to secondhand smoke (0 = None)",
            Field::AlcoholUse => "Level of alcohol consumption",
            Field::ObesityLevel => "Body mass assessment",
            Field::BalancedDiet => "How well-balanced is your diet? (1 = Poor, 9 = Excellent)",
            Field::CoughingBlood => "Presence of blood when coughing",
            Field::Wheezing => "Whistling sound while breathing",
            Field::ShortnessOfBreath => "Difficulty catching your breath",
            Field::SwallowingDifficulty => "Trouble swallowing food or liquids",
            Field::DryCough => "Persistent cough without mucus",
            Field::ChestPain => "Pain or tightness in the chest",
            Field::Snoring => "Snoring frequency",
            Field::Fatigue => "Persistent tiredness",
            Field::WeightLoss => "Unexplained weight loss",
            Field::ClubbingFingers => "Rounded, enlarged fingertips",
            Field::FrequentColds => "How often you catch colds",
            Field::AirPollution => "Level of exposure to polluted air",
            Field::OccupationalHazards => "Exposure to harmful substances at work",
            Field::DustAllergy => "Sensitivity or reaction to dust",
            Field::GeneticRisk => "History of lung cancer in your family",
            Field::ChronicLungDisease => "COPD, Asthma, or other chronic conditions",
        }
    }
}
