//! Cardiovascular risk assessment: record validation, the scoring engine, and the
//! storage, history, and dashboard surfaces that consume its outcome.
//!
//! Every surface that shows a risk level reads it from the engine's stored
//! [`PredictionOutcome`]; nothing outside `engine` derives a score of its own.

pub mod dashboard;
pub mod domain;
pub mod engine;
pub mod history;
pub mod importer;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use dashboard::{DashboardSummary, GenderDistribution, RiskDistribution};
pub use domain::{
    AssessmentId, ChestPainType, ClinicalRecord, Gender, PatientSubmission, RestingEcg, StSlope,
};
pub use engine::{
    classify, evaluate, predict, recommend, Evaluation, FactorValue, PredictionOutcome,
    RiskFactor, RiskFactorKind, RiskLevel,
};
pub use history::{GenderFilter, HistoryEntry, HistoryQuery, HistorySort};
pub use importer::{CsvPatientImporter, ImportError};
pub use repository::{AssessmentRecord, AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use service::{AssessmentService, AssessmentServiceError};
pub use validation::{InvalidFieldError, SubmissionError};
