use tracing::debug;

use super::super::domain::ClinicalRecord;
use super::classifier::RiskLevel;
use super::rules::RiskFactor;

const CHECK_UP: &str = "Schedule regular check-ups with your cardiologist";

const LOW_RISK_MAINTENANCE: [&str; 3] = [
    "Continue maintaining a healthy lifestyle",
    "Exercise regularly (150 minutes moderate activity per week)",
    "Follow a heart-healthy diet rich in fruits and vegetables",
];

const CARDIOLOGIST_CONSULT: &str = "Consult with a cardiologist for comprehensive evaluation";

const URGENT_EVALUATION: [&str; 2] = [
    "Consider immediate medical evaluation",
    "May require cardiac stress testing or imaging",
];

const GENERAL_LIFESTYLE: [&str; 4] = [
    "Adopt Mediterranean diet or DASH diet",
    "Maintain healthy weight (BMI 18.5-25)",
    "Limit alcohol consumption",
    "Manage stress through relaxation techniques",
];

// Gates read the raw record and are stricter than the scoring tiers
// (BP > 140 here against >= 140 there).
const BLOOD_PRESSURE_GATE: i32 = 140;
const CHOLESTEROL_GATE: i32 = 240;
const ST_DEPRESSION_GATE: f64 = 2.0;
const SCREENING_AGE_GATE: i32 = 60;

struct RecordGate {
    applies: fn(&ClinicalRecord) -> bool,
    advice: [&'static str; 2],
}

static RECORD_GATES: [RecordGate; 6] = [
    RecordGate {
        applies: blood_pressure_gate,
        advice: [
            "Blood pressure management is critical - discuss medications with your doctor",
            "Reduce sodium intake and maintain healthy weight",
        ],
    },
    RecordGate {
        applies: cholesterol_gate,
        advice: [
            "Cholesterol management required - consider statin therapy",
            "Follow a low-cholesterol, low-saturated fat diet",
        ],
    },
    RecordGate {
        applies: smoking_gate,
        advice: [
            "Smoking cessation is the single most important step",
            "Consider nicotine replacement therapy or counseling",
        ],
    },
    RecordGate {
        applies: diabetes_gate,
        advice: [
            "Optimal diabetes control is essential for heart health",
            "Monitor HbA1c levels regularly",
        ],
    },
    RecordGate {
        applies: exertion_gate,
        advice: [
            "Avoid strenuous exercise until cleared by cardiologist",
            "Consider cardiac rehabilitation program",
        ],
    },
    RecordGate {
        applies: screening_age_gate,
        advice: [
            "Consider annual cardiac screening",
            "Monitor for symptoms: chest pain, breathlessness, fatigue",
        ],
    },
];

fn blood_pressure_gate(record: &ClinicalRecord) -> bool {
    record.resting_bp > BLOOD_PRESSURE_GATE
}

fn cholesterol_gate(record: &ClinicalRecord) -> bool {
    record.cholesterol > CHOLESTEROL_GATE
}

fn smoking_gate(record: &ClinicalRecord) -> bool {
    record.smoking
}

fn diabetes_gate(record: &ClinicalRecord) -> bool {
    record.diabetes
}

fn exertion_gate(record: &ClinicalRecord) -> bool {
    record.exercise_angina || record.oldpeak > ST_DEPRESSION_GATE
}

fn screening_age_gate(record: &ClinicalRecord) -> bool {
    record.age > SCREENING_AGE_GATE
}

/// Build the ordered advisory list for a record at the given level.
///
/// The first entry is always the check-up reminder. Items are appended in
/// priority order and never deduplicated, so overlapping gates repeat advice.
/// `factors` does not drive any gate.
pub fn recommend(record: &ClinicalRecord, level: RiskLevel, factors: &[RiskFactor]) -> Vec<String> {
    debug!(
        level = level.label(),
        factors = factors.len(),
        "generating recommendations"
    );

    let mut recommendations = vec![CHECK_UP.to_string()];

    if level == RiskLevel::Low {
        recommendations.extend(LOW_RISK_MAINTENANCE.iter().map(|item| item.to_string()));
    } else {
        recommendations.push(CARDIOLOGIST_CONSULT.to_string());
        if level.is_elevated() {
            recommendations.extend(URGENT_EVALUATION.iter().map(|item| item.to_string()));
        }
    }

    for gate in RECORD_GATES.iter().filter(|gate| (gate.applies)(record)) {
        recommendations.extend(gate.advice.iter().map(|item| item.to_string()));
    }

    if level != RiskLevel::Low {
        recommendations.extend(GENERAL_LIFESTYLE.iter().map(|item| item.to_string()));
    }

    recommendations
}
