use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AssessmentId, Gender};
use super::engine::RiskLevel;
use super::repository::AssessmentRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderFilter {
    #[default]
    All,
    Male,
    Female,
}

impl GenderFilter {
    fn matches(self, gender: Gender) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Male => gender == Gender::Male,
            GenderFilter::Female => gender == Gender::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistorySort {
    /// Newest assessment first.
    #[default]
    Date,
    /// Patient name, case-insensitive A to Z.
    Name,
    /// Oldest patient first.
    Age,
    /// Highest engine risk score first.
    Risk,
}

/// Search, filter, and ordering options for the assessment history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    pub search: Option<String>,
    pub gender: GenderFilter,
    pub sort: HistorySort,
}

/// Row of the history listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: AssessmentId,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub assessed_at: DateTime<Utc>,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub risk_level_label: &'static str,
}

impl HistoryEntry {
    pub fn from_record(record: &AssessmentRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.patient.name.clone(),
            age: record.patient.record.age,
            gender: record.patient.record.gender,
            assessed_at: record.assessed_at,
            risk_score: record.outcome.risk_score,
            risk_level: record.outcome.risk_level,
            risk_level_label: record.outcome.risk_level.display_name(),
        }
    }
}

impl HistoryQuery {
    fn matches(&self, record: &AssessmentRecord) -> bool {
        let name_matches = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => record
                .patient
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };

        name_matches && self.gender.matches(record.patient.record.gender)
    }

    fn compare(&self, a: &AssessmentRecord, b: &AssessmentRecord) -> Ordering {
        match self.sort {
            HistorySort::Date => b.assessed_at.cmp(&a.assessed_at),
            HistorySort::Name => a
                .patient
                .name
                .to_lowercase()
                .cmp(&b.patient.name.to_lowercase()),
            HistorySort::Age => b.patient.record.age.cmp(&a.patient.record.age),
            HistorySort::Risk => b.outcome.risk_score.cmp(&a.outcome.risk_score),
        }
    }

    /// Filter and order records. The sort is stable, so ties keep the
    /// repository's newest-first order.
    pub fn apply(&self, records: &[AssessmentRecord]) -> Vec<HistoryEntry> {
        let mut matching: Vec<&AssessmentRecord> =
            records.iter().filter(|record| self.matches(record)).collect();
        matching.sort_by(|a, b| self.compare(a, b));
        matching.into_iter().map(HistoryEntry::from_record).collect()
    }
}
