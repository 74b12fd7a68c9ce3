use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validation::InvalidFieldError;

/// Identifier assigned to a stored assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structured clinical record scored by the engine.
///
/// Numeric fields are signed so that out-of-domain input reaches validation
/// instead of failing inside the deserializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalRecord {
    pub age: i32,
    pub gender: Gender,
    pub chest_pain_type: ChestPainType,
    /// Resting blood pressure in mmHg.
    pub resting_bp: i32,
    /// Serum cholesterol in mg/dl.
    pub cholesterol: i32,
    /// Fasting blood sugar above 120 mg/dl.
    pub fasting_bs: bool,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: i32,
    pub exercise_angina: bool,
    /// ST depression induced by exercise relative to rest.
    pub oldpeak: f64,
    pub st_slope: StSlope,
    pub smoking: bool,
    pub diabetes: bool,
    pub family_history: bool,
}

/// Payload captured by the intake form: the patient's name plus the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSubmission {
    pub name: String,
    pub record: ClinicalRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = InvalidFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(InvalidFieldError::unrecognized("gender", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChestPainType {
    Typical,
    Atypical,
    NonAnginal,
    Asymptomatic,
}

impl ChestPainType {
    pub const fn label(self) -> &'static str {
        match self {
            ChestPainType::Typical => "typical",
            ChestPainType::Atypical => "atypical",
            ChestPainType::NonAnginal => "non-anginal",
            ChestPainType::Asymptomatic => "asymptomatic",
        }
    }
}

impl FromStr for ChestPainType {
    type Err = InvalidFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "typical" => Ok(ChestPainType::Typical),
            "atypical" => Ok(ChestPainType::Atypical),
            "non-anginal" => Ok(ChestPainType::NonAnginal),
            "asymptomatic" => Ok(ChestPainType::Asymptomatic),
            _ => Err(InvalidFieldError::unrecognized("chest_pain_type", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestingEcg {
    Normal,
    StTAbnormality,
    LeftVentricularHypertrophy,
}

impl RestingEcg {
    pub const fn label(self) -> &'static str {
        match self {
            RestingEcg::Normal => "normal",
            RestingEcg::StTAbnormality => "st-t-abnormality",
            RestingEcg::LeftVentricularHypertrophy => "left-ventricular-hypertrophy",
        }
    }
}

impl FromStr for RestingEcg {
    type Err = InvalidFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(RestingEcg::Normal),
            "st-t-abnormality" => Ok(RestingEcg::StTAbnormality),
            "left-ventricular-hypertrophy" => Ok(RestingEcg::LeftVentricularHypertrophy),
            _ => Err(InvalidFieldError::unrecognized("resting_ecg", value)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StSlope {
    Up,
    Flat,
    Down,
}

impl StSlope {
    pub const fn label(self) -> &'static str {
        match self {
            StSlope::Up => "up",
            StSlope::Flat => "flat",
            StSlope::Down => "down",
        }
    }
}

impl FromStr for StSlope {
    type Err = InvalidFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(StSlope::Up),
            "flat" => Ok(StSlope::Flat),
            "down" => Ok(StSlope::Down),
            _ => Err(InvalidFieldError::unrecognized("st_slope", value)),
        }
    }
}
