use crate::infra::InMemoryAssessmentRepository;
use cardio_predict::assessment::{
    predict, AssessmentRecord, AssessmentService, AssessmentServiceError, ChestPainType,
    ClinicalRecord, CsvPatientImporter, DashboardSummary, Gender, HistoryEntry, HistoryQuery,
    HistorySort, PatientSubmission, PredictionOutcome, RestingEcg, StSlope,
};
use cardio_predict::error::AppError;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) age: i32,
    /// male | female
    #[arg(long)]
    pub(crate) gender: Gender,
    /// typical | atypical | non-anginal | asymptomatic
    #[arg(long)]
    pub(crate) chest_pain_type: ChestPainType,
    /// Resting blood pressure (mmHg)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) resting_bp: i32,
    /// Serum cholesterol (mg/dl)
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) cholesterol: i32,
    /// Fasting blood sugar above 120 mg/dl
    #[arg(long)]
    pub(crate) fasting_bs: bool,
    /// normal | st-t-abnormality | left-ventricular-hypertrophy
    #[arg(long, default_value = "normal")]
    pub(crate) resting_ecg: RestingEcg,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) max_heart_rate: i32,
    #[arg(long)]
    pub(crate) exercise_angina: bool,
    /// ST depression induced by exercise
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub(crate) oldpeak: f64,
    /// up | flat | down
    #[arg(long, default_value = "up")]
    pub(crate) st_slope: StSlope,
    #[arg(long)]
    pub(crate) smoking: bool,
    #[arg(long)]
    pub(crate) diabetes: bool,
    #[arg(long)]
    pub(crate) family_history: bool,
    /// Print the outcome as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl AssessArgs {
    fn record(&self) -> ClinicalRecord {
        ClinicalRecord {
            age: self.age,
            gender: self.gender,
            chest_pain_type: self.chest_pain_type,
            resting_bp: self.resting_bp,
            cholesterol: self.cholesterol,
            fasting_bs: self.fasting_bs,
            resting_ecg: self.resting_ecg,
            max_heart_rate: self.max_heart_rate,
            exercise_angina: self.exercise_angina,
            oldpeak: self.oldpeak,
            st_slope: self.st_slope,
            smoking: self.smoking,
            diabetes: self.diabetes,
            family_history: self.family_history,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export with one patient per row
    pub(crate) csv: PathBuf,
    /// Sort the history table by date, name, age, or risk
    #[arg(long, default_value = "risk")]
    pub(crate) sort: String,
    /// Print stored records and the dashboard as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Number of recent assessments listed on the dashboard
    #[arg(long, default_value_t = 5)]
    pub(crate) recent: usize,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let record = args.record();
    let outcome = predict(&record).map_err(AssessmentServiceError::from)?;

    if args.json {
        print_json("Prediction outcome", &outcome);
    } else {
        render_outcome(&outcome);
    }
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs { csv, sort, json } = args;
    let sort = parse_sort(&sort);

    let submissions = CsvPatientImporter::from_path(&csv)?;
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let service = AssessmentService::new(repository);

    let mut stored = Vec::with_capacity(submissions.len());
    for submission in submissions {
        stored.push(service.submit(submission)?);
    }

    let history = service.history(&HistoryQuery {
        sort,
        ..HistoryQuery::default()
    })?;
    let dashboard = service.dashboard()?;

    if json {
        print_json("Stored assessments", &stored);
        print_json("Dashboard", &dashboard);
        return Ok(());
    }

    println!(
        "Imported {} patients from {}",
        stored.len(),
        csv.display()
    );
    render_history(&history);
    render_dashboard(&dashboard);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Cardiovascular risk assessment demo");
    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let service = AssessmentService::with_recent_limit(repository, args.recent);

    for submission in sample_patients() {
        let name = submission.name.clone();
        match service.submit(submission) {
            Ok(record) => render_record(&record),
            Err(err) => println!("\n- {}: submission rejected ({})", name, err),
        }
    }

    let mut rejected = sample_patients()
        .into_iter()
        .next()
        .ok_or_else(|| std::io::Error::other("no sample patients"))?;
    rejected.name = "Invalid Reading".to_string();
    rejected.record.max_heart_rate = 0;
    match service.submit(rejected) {
        Ok(record) => render_record(&record),
        Err(err) => println!("\n- Invalid Reading: submission rejected ({})", err),
    }

    let history = service.history(&HistoryQuery {
        sort: HistorySort::Risk,
        ..HistoryQuery::default()
    })?;
    render_history(&history);
    render_dashboard(&service.dashboard()?);
    Ok(())
}

fn parse_sort(raw: &str) -> HistorySort {
    match raw.trim().to_ascii_lowercase().as_str() {
        "name" => HistorySort::Name,
        "age" => HistorySort::Age,
        "risk" => HistorySort::Risk,
        _ => HistorySort::Date,
    }
}

pub(crate) fn sample_patients() -> Vec<PatientSubmission> {
    vec![
        PatientSubmission {
            name: "Maria Alvarez".to_string(),
            record: ClinicalRecord {
                age: 34,
                gender: Gender::Female,
                chest_pain_type: ChestPainType::Asymptomatic,
                resting_bp: 112,
                cholesterol: 176,
                fasting_bs: false,
                resting_ecg: RestingEcg::Normal,
                max_heart_rate: 181,
                exercise_angina: false,
                oldpeak: 0.0,
                st_slope: StSlope::Up,
                smoking: false,
                diabetes: false,
                family_history: false,
            },
        },
        PatientSubmission {
            name: "James Whitfield".to_string(),
            record: ClinicalRecord {
                age: 52,
                gender: Gender::Male,
                chest_pain_type: ChestPainType::NonAnginal,
                resting_bp: 136,
                cholesterol: 228,
                fasting_bs: false,
                resting_ecg: RestingEcg::Normal,
                max_heart_rate: 150,
                exercise_angina: false,
                oldpeak: 0.8,
                st_slope: StSlope::Up,
                smoking: false,
                diabetes: false,
                family_history: false,
            },
        },
        PatientSubmission {
            name: "Evelyn Park".to_string(),
            record: ClinicalRecord {
                age: 63,
                gender: Gender::Female,
                chest_pain_type: ChestPainType::Asymptomatic,
                resting_bp: 148,
                cholesterol: 262,
                fasting_bs: false,
                resting_ecg: RestingEcg::Normal,
                max_heart_rate: 140,
                exercise_angina: false,
                oldpeak: 1.2,
                st_slope: StSlope::Flat,
                smoking: false,
                diabetes: false,
                family_history: false,
            },
        },
        PatientSubmission {
            name: "Robert Okafor".to_string(),
            record: ClinicalRecord {
                age: 71,
                gender: Gender::Male,
                chest_pain_type: ChestPainType::Typical,
                resting_bp: 182,
                cholesterol: 305,
                fasting_bs: true,
                resting_ecg: RestingEcg::LeftVentricularHypertrophy,
                max_heart_rate: 104,
                exercise_angina: true,
                oldpeak: 3.2,
                st_slope: StSlope::Down,
                smoking: true,
                diabetes: true,
                family_history: true,
            },
        },
    ]
}

fn print_json<T: serde::Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("{} unavailable: {}", label, err),
    }
}

fn render_record(record: &AssessmentRecord) {
    println!(
        "\n- {} ({}, {} y/o {}) assessed {}",
        record.patient.name,
        record.id,
        record.patient.record.age,
        record.patient.record.gender.label(),
        record
            .assessed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
    render_outcome(&record.outcome);
}

pub(crate) fn render_outcome(outcome: &PredictionOutcome) {
    println!(
        "  Risk score {} / 100 | probability {:.1}% | level {}",
        outcome.risk_score,
        outcome.probability * 100.0,
        outcome.risk_level.display_name()
    );

    if outcome.risk_factors.is_empty() {
        println!("  Risk factors: none identified");
    } else {
        println!("  Risk factors:");
        for factor in &outcome.risk_factors {
            println!("    - {}", factor);
        }
    }

    println!("  Recommendations:");
    for (index, item) in outcome.recommendations.iter().enumerate() {
        println!("    {}. {}", index + 1, item);
    }
}

fn render_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("\nAssessment history: none");
        return;
    }

    println!("\nAssessment history");
    for entry in entries {
        println!(
            "- {} | {} | {} y/o {} | score {} ({})",
            entry.id,
            entry.name,
            entry.age,
            entry.gender.label(),
            entry.risk_score,
            entry.risk_level_label
        );
    }
}

fn render_dashboard(summary: &DashboardSummary) {
    println!("\nDashboard");
    println!(
        "- {} patients | average age {} | {} high risk",
        summary.total_patients, summary.average_age, summary.high_risk_patients
    );
    println!(
        "- Gender: {} male / {} female",
        summary.gender_distribution.male, summary.gender_distribution.female
    );
    println!("Risk distribution:");
    for share in &summary.risk_shares {
        println!("  - {}: {} ({}%)", share.label, share.count, share.percent);
    }
    if !summary.recent.is_empty() {
        println!("Recent assessments:");
        for entry in &summary.recent {
            println!(
                "  - {} {} ({})",
                entry.id, entry.name, entry.risk_level_label
            );
        }
    }
}
