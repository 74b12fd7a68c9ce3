use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::assessment::domain::{
    AssessmentId, ChestPainType, ClinicalRecord, Gender, PatientSubmission, RestingEcg, StSlope,
};
use crate::assessment::engine::predict;
use crate::assessment::repository::{AssessmentRecord, AssessmentRepository, RepositoryError};
use crate::assessment::{assessment_router, AssessmentService};

/// Every field at its least severe value: scores zero.
pub(super) fn low_risk_record() -> ClinicalRecord {
    ClinicalRecord {
        age: 30,
        gender: Gender::Female,
        chest_pain_type: ChestPainType::Asymptomatic,
        resting_bp: 110,
        cholesterol: 180,
        fasting_bs: false,
        resting_ecg: RestingEcg::Normal,
        max_heart_rate: 190,
        exercise_angina: false,
        oldpeak: 0.0,
        st_slope: StSlope::Up,
        smoking: false,
        diabetes: false,
        family_history: false,
    }
}

/// Scores 44: middle age, male, elevated BP, atypical angina, and the unnamed
/// heart-rate-reserve tier (140 / 165).
pub(super) fn moderate_risk_record() -> ClinicalRecord {
    ClinicalRecord {
        age: 55,
        gender: Gender::Male,
        chest_pain_type: ChestPainType::Atypical,
        resting_bp: 135,
        cholesterol: 190,
        fasting_bs: false,
        resting_ecg: RestingEcg::Normal,
        max_heart_rate: 140,
        exercise_angina: false,
        oldpeak: 0.5,
        st_slope: StSlope::Up,
        smoking: false,
        diabetes: false,
        family_history: false,
    }
}

/// Every field at its most severe tier: 220 before capping.
pub(super) fn maximal_risk_record() -> ClinicalRecord {
    ClinicalRecord {
        age: 70,
        gender: Gender::Male,
        chest_pain_type: ChestPainType::Typical,
        resting_bp: 180,
        cholesterol: 300,
        fasting_bs: true,
        resting_ecg: RestingEcg::LeftVentricularHypertrophy,
        max_heart_rate: 100,
        exercise_angina: true,
        oldpeak: 3.0,
        st_slope: StSlope::Down,
        smoking: true,
        diabetes: true,
        family_history: true,
    }
}

pub(super) fn submission(name: &str, record: ClinicalRecord) -> PatientSubmission {
    PatientSubmission {
        name: name.to_string(),
        record,
    }
}

/// Stored record with a fixed timestamp on `day` of January 2025.
pub(super) fn stored_record(id: &str, name: &str, record: ClinicalRecord, day: u32) -> AssessmentRecord {
    let outcome = predict(&record).expect("fixture records are valid");
    AssessmentRecord {
        id: AssessmentId(id.to_string()),
        assessed_at: Utc
            .with_ymd_and_hms(2025, 1, day, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
        patient: submission(name, record),
        outcome,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<Vec<AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().rev().cloned().collect())
    }
}

pub(super) struct ConflictRepository;

impl AssessmentRepository for ConflictRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Ok(None)
    }

    fn all(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance window".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance window".to_string()))
    }

    fn all(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance window".to_string()))
    }
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, MemoryRepository) {
    let repository = MemoryRepository::default();
    let service = AssessmentService::new(Arc::new(repository.clone()));
    (service, repository)
}

pub(super) fn router_with_service(service: AssessmentService<MemoryRepository>) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}
