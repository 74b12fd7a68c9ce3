use serde::{Deserialize, Serialize};

use super::super::domain::{ChestPainType, ClinicalRecord, Gender, RestingEcg, StSlope};

/// Upper bound of the reported risk score. Applied once, after every rule ran.
pub const MAX_RISK_SCORE: u32 = 100;

/// Field group a risk factor was raised by, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    Age,
    Gender,
    RestingBloodPressure,
    Cholesterol,
    ChestPain,
    FastingBloodSugar,
    RestingEcg,
    HeartRateReserve,
    ExerciseAngina,
    StDepression,
    StSlope,
    Smoking,
    Diabetes,
    FamilyHistory,
}

/// Raw record value that triggered a factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FactorValue {
    Integer(i32),
    Decimal(f64),
    Flag(bool),
    Category(&'static str),
}

/// Named, weighted condition detected in a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    pub kind: RiskFactorKind,
    pub name: &'static str,
    pub value: FactorValue,
    pub weight: u32,
}

/// Result of running the rule table over one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Sum of every triggered weight, before capping.
    pub raw_score: u32,
    /// Named factors in rule-table order.
    pub factors: Vec<RiskFactor>,
}

impl Evaluation {
    pub fn risk_score(&self) -> u8 {
        // MAX_RISK_SCORE fits in u8.
        self.raw_score.min(MAX_RISK_SCORE) as u8
    }

    pub fn factor_names(&self) -> Vec<String> {
        self.factors
            .iter()
            .map(|factor| factor.name.to_string())
            .collect()
    }
}

/// Threshold tier; the value must be at or above `floor`. A tier without a name
/// still contributes its weight but raises no factor.
struct Tier<T> {
    floor: T,
    weight: u32,
    name: Option<&'static str>,
}

/// Tier matched when the value is strictly below `ceiling`.
struct CeilingTier {
    ceiling: f64,
    weight: u32,
    name: Option<&'static str>,
}

// Tier tables are ordered most severe first; only the first match fires.
static AGE_TIERS: [Tier<i32>; 4] = [
    Tier {
        floor: 70,
        weight: 25,
        name: Some("Advanced age (≥70)"),
    },
    Tier {
        floor: 60,
        weight: 15,
        name: Some("Older age (60-69)"),
    },
    Tier {
        floor: 50,
        weight: 10,
        name: Some("Middle age (50-59)"),
    },
    Tier {
        floor: 40,
        weight: 0,
        name: None,
    },
];

const MALE_RISK_AGE_LIMIT: i32 = 65;
const MALE_WEIGHT: u32 = 8;

static BLOOD_PRESSURE_TIERS: [Tier<i32>; 3] = [
    Tier {
        floor: 180,
        weight: 20,
        name: Some("Severe hypertension (≥180 mmHg)"),
    },
    Tier {
        floor: 140,
        weight: 15,
        name: Some("High blood pressure (140-179 mmHg)"),
    },
    Tier {
        floor: 130,
        weight: 8,
        name: Some("Elevated blood pressure (130-139 mmHg)"),
    },
];

static CHOLESTEROL_TIERS: [Tier<i32>; 3] = [
    Tier {
        floor: 300,
        weight: 20,
        name: Some("Very high cholesterol (≥300 mg/dl)"),
    },
    Tier {
        floor: 240,
        weight: 15,
        name: Some("High cholesterol (240-299 mg/dl)"),
    },
    Tier {
        floor: 200,
        weight: 8,
        name: Some("Borderline high cholesterol (200-239 mg/dl)"),
    },
];

const FASTING_BLOOD_SUGAR_WEIGHT: u32 = 10;

/// Age-predicted maximum heart rate is `220 - age`.
const PREDICTED_MAX_HEART_RATE: i64 = 220;

static HEART_RATE_RESERVE_TIERS: [CeilingTier; 2] = [
    CeilingTier {
        ceiling: 0.75,
        weight: 12,
        name: Some("Poor exercise capacity (low max heart rate)"),
    },
    CeilingTier {
        ceiling: 0.85,
        weight: 6,
        name: None,
    },
];

const EXERCISE_ANGINA_WEIGHT: u32 = 15;

static ST_DEPRESSION_TIERS: [Tier<f64>; 3] = [
    Tier {
        floor: 3.0,
        weight: 18,
        name: Some("Severe ST depression (≥3.0)"),
    },
    Tier {
        floor: 2.0,
        weight: 12,
        name: Some("Moderate ST depression (2.0-2.9)"),
    },
    Tier {
        floor: 1.0,
        weight: 6,
        name: Some("Mild ST depression (1.0-1.9)"),
    },
];

const SMOKING_WEIGHT: u32 = 20;
const DIABETES_WEIGHT: u32 = 18;
const FAMILY_HISTORY_WEIGHT: u32 = 12;

#[derive(Default)]
struct Tally {
    raw_score: u32,
    factors: Vec<RiskFactor>,
}

impl Tally {
    fn add(
        &mut self,
        kind: RiskFactorKind,
        weight: u32,
        name: Option<&'static str>,
        value: FactorValue,
    ) {
        self.raw_score += weight;
        if let Some(name) = name {
            self.factors.push(RiskFactor {
                kind,
                name,
                value,
                weight,
            });
        }
    }

    fn add_tier<T>(&mut self, kind: RiskFactorKind, tier: Option<&Tier<T>>, value: FactorValue) {
        if let Some(tier) = tier {
            self.add(kind, tier.weight, tier.name, value);
        }
    }

    fn add_flag(&mut self, kind: RiskFactorKind, present: bool, weight: u32, name: &'static str) {
        if present {
            self.add(kind, weight, Some(name), FactorValue::Flag(true));
        }
    }
}

fn highest_tier<T: PartialOrd + Copy>(value: T, tiers: &[Tier<T>]) -> Option<&Tier<T>> {
    tiers.iter().find(|tier| value >= tier.floor)
}

fn chest_pain_rule(chest_pain: ChestPainType) -> (u32, Option<&'static str>) {
    match chest_pain {
        ChestPainType::Typical => (20, Some("Typical angina chest pain")),
        ChestPainType::Atypical => (12, Some("Atypical angina chest pain")),
        ChestPainType::NonAnginal => (5, None),
        ChestPainType::Asymptomatic => (0, None),
    }
}

fn resting_ecg_rule(ecg: RestingEcg) -> (u32, Option<&'static str>) {
    match ecg {
        RestingEcg::LeftVentricularHypertrophy => {
            (15, Some("Left ventricular hypertrophy on ECG"))
        }
        RestingEcg::StTAbnormality => (10, Some("ST-T wave abnormalities on ECG")),
        RestingEcg::Normal => (0, None),
    }
}

fn st_slope_rule(slope: StSlope) -> (u32, Option<&'static str>) {
    match slope {
        StSlope::Down => (15, Some("Downsloping ST segment")),
        StSlope::Flat => (8, Some("Flat ST segment")),
        StSlope::Up => (0, None),
    }
}

/// Ratio of achieved to age-predicted maximum heart rate.
///
/// `None` when the predicted maximum is not positive (age 220 and above).
pub fn heart_rate_reserve(record: &ClinicalRecord) -> Option<f64> {
    let predicted = PREDICTED_MAX_HEART_RATE - i64::from(record.age);
    if predicted <= 0 {
        return None;
    }
    Some(f64::from(record.max_heart_rate) / predicted as f64)
}

fn heart_rate_reserve_tier(reserve: Option<f64>) -> Option<&'static CeilingTier> {
    match reserve {
        Some(ratio) => HEART_RATE_RESERVE_TIERS
            .iter()
            .find(|tier| ratio < tier.ceiling),
        // No meaningful predicted maximum: score as the worst tier.
        None => HEART_RATE_RESERVE_TIERS.first(),
    }
}

/// Run the rule table over a record.
///
/// Total for any record; values are not validated here and the raw score is not
/// capped.
pub fn evaluate(record: &ClinicalRecord) -> Evaluation {
    let mut tally = Tally::default();

    tally.add_tier(
        RiskFactorKind::Age,
        highest_tier(record.age, &AGE_TIERS),
        FactorValue::Integer(record.age),
    );

    if record.gender == Gender::Male && record.age < MALE_RISK_AGE_LIMIT {
        tally.add(
            RiskFactorKind::Gender,
            MALE_WEIGHT,
            Some("Male gender (higher risk at younger age)"),
            FactorValue::Category(record.gender.label()),
        );
    }

    tally.add_tier(
        RiskFactorKind::RestingBloodPressure,
        highest_tier(record.resting_bp, &BLOOD_PRESSURE_TIERS),
        FactorValue::Integer(record.resting_bp),
    );

    tally.add_tier(
        RiskFactorKind::Cholesterol,
        highest_tier(record.cholesterol, &CHOLESTEROL_TIERS),
        FactorValue::Integer(record.cholesterol),
    );

    let (weight, name) = chest_pain_rule(record.chest_pain_type);
    tally.add(
        RiskFactorKind::ChestPain,
        weight,
        name,
        FactorValue::Category(record.chest_pain_type.label()),
    );

    tally.add_flag(
        RiskFactorKind::FastingBloodSugar,
        record.fasting_bs,
        FASTING_BLOOD_SUGAR_WEIGHT,
        "Elevated fasting blood sugar (>120 mg/dl)",
    );

    let (weight, name) = resting_ecg_rule(record.resting_ecg);
    tally.add(
        RiskFactorKind::RestingEcg,
        weight,
        name,
        FactorValue::Category(record.resting_ecg.label()),
    );

    if let Some(tier) = heart_rate_reserve_tier(heart_rate_reserve(record)) {
        tally.add(
            RiskFactorKind::HeartRateReserve,
            tier.weight,
            tier.name,
            FactorValue::Integer(record.max_heart_rate),
        );
    }

    tally.add_flag(
        RiskFactorKind::ExerciseAngina,
        record.exercise_angina,
        EXERCISE_ANGINA_WEIGHT,
        "Exercise-induced angina",
    );

    tally.add_tier(
        RiskFactorKind::StDepression,
        highest_tier(record.oldpeak, &ST_DEPRESSION_TIERS),
        FactorValue::Decimal(record.oldpeak),
    );

    let (weight, name) = st_slope_rule(record.st_slope);
    tally.add(
        RiskFactorKind::StSlope,
        weight,
        name,
        FactorValue::Category(record.st_slope.label()),
    );

    tally.add_flag(
        RiskFactorKind::Smoking,
        record.smoking,
        SMOKING_WEIGHT,
        "Current or former smoker",
    );
    tally.add_flag(
        RiskFactorKind::Diabetes,
        record.diabetes,
        DIABETES_WEIGHT,
        "Diabetes mellitus",
    );
    tally.add_flag(
        RiskFactorKind::FamilyHistory,
        record.family_history,
        FAMILY_HISTORY_WEIGHT,
        "Family history of heart disease",
    );

    Evaluation {
        raw_score: tally.raw_score,
        factors: tally.factors,
    }
}
