use serde::Serialize;

use super::domain::Gender;
use super::engine::RiskLevel;
use super::history::HistoryEntry;
use super::repository::AssessmentRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub moderate: usize,
    pub high: usize,
    pub very_high: usize,
}

impl RiskDistribution {
    pub fn count(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::High => self.high,
            RiskLevel::VeryHigh => self.very_high,
        }
    }

    fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Moderate => self.moderate += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::VeryHigh => self.very_high += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenderDistribution {
    pub male: usize,
    pub female: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskShare {
    pub level: RiskLevel,
    pub label: &'static str,
    pub count: usize,
    /// Rounded share of all patients, 0 when there are none.
    pub percent: u8,
}

/// Aggregate statistics over stored assessments.
///
/// Risk counts come from each record's stored outcome, so the dashboard always
/// agrees with the result shown for an individual patient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_patients: usize,
    pub average_age: i32,
    pub risk_distribution: RiskDistribution,
    pub risk_shares: Vec<RiskShare>,
    pub high_risk_patients: usize,
    pub gender_distribution: GenderDistribution,
    pub recent: Vec<HistoryEntry>,
}

impl DashboardSummary {
    /// `records` must be newest first, as returned by the repository.
    pub fn from_records(records: &[AssessmentRecord], recent_limit: usize) -> Self {
        let total_patients = records.len();

        let average_age = if total_patients == 0 {
            0
        } else {
            let sum: i64 = records
                .iter()
                .map(|record| i64::from(record.patient.record.age))
                .sum();
            (sum as f64 / total_patients as f64).round() as i32
        };

        let mut risk_distribution = RiskDistribution::default();
        let mut gender_distribution = GenderDistribution::default();
        for record in records {
            risk_distribution.record(record.outcome.risk_level);
            match record.patient.record.gender {
                Gender::Male => gender_distribution.male += 1,
                Gender::Female => gender_distribution.female += 1,
            }
        }

        let risk_shares = RiskLevel::ordered()
            .into_iter()
            .map(|level| {
                let count = risk_distribution.count(level);
                RiskShare {
                    level,
                    label: level.display_name(),
                    count,
                    percent: percent_of(count, total_patients),
                }
            })
            .collect();

        let high_risk_patients = risk_distribution.high + risk_distribution.very_high;

        let recent = records
            .iter()
            .take(recent_limit)
            .map(HistoryEntry::from_record)
            .collect();

        Self {
            total_patients,
            average_age,
            risk_distribution,
            risk_shares,
            high_risk_patients,
            gender_distribution,
            recent,
        }
    }
}

fn percent_of(count: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u8
}
