mod classifier;
mod recommendations;
mod rules;

pub use classifier::{classify, probability, RiskLevel};
pub use recommendations::recommend;
pub use rules::{
    evaluate, heart_rate_reserve, Evaluation, FactorValue, RiskFactor, RiskFactorKind,
    MAX_RISK_SCORE,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::ClinicalRecord;
use super::validation::{validate, InvalidFieldError};

/// Assessment produced for one clinical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    /// Capped score in `0..=100`.
    pub risk_score: u8,
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Validate a record and run evaluation, classification, and recommendation.
pub fn predict(record: &ClinicalRecord) -> Result<PredictionOutcome, InvalidFieldError> {
    validate(record)?;
    Ok(assess(record))
}

fn assess(record: &ClinicalRecord) -> PredictionOutcome {
    let evaluation = evaluate(record);
    let risk_score = evaluation.risk_score();
    let (probability, risk_level) = classify(risk_score);
    let recommendations = recommend(record, risk_level, &evaluation.factors);

    debug!(
        raw_score = evaluation.raw_score,
        risk_score,
        risk_level = risk_level.label(),
        "risk evaluation complete"
    );

    PredictionOutcome {
        risk_score,
        probability,
        risk_level,
        risk_factors: evaluation.factor_names(),
        recommendations,
    }
}
