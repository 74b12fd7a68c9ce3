use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{ClinicalRecord, PatientSubmission};
use super::validation::InvalidFieldError;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidField {
        row: usize,
        source: InvalidFieldError,
    },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read patient export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid patient CSV data: {}", err),
            ImportError::InvalidField { row, source } => {
                write!(f, "patient row {}: {}", row, source)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidField { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads patient submissions from a CSV export, one patient per row.
pub struct CsvPatientImporter;

impl CsvPatientImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PatientSubmission>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<PatientSubmission>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut submissions = Vec::new();

        for (index, row) in csv_reader.deserialize::<PatientRow>().enumerate() {
            let row = row?;
            // Header is line 1.
            let submission = row
                .into_submission()
                .map_err(|source| ImportError::InvalidField {
                    row: index + 2,
                    source,
                })?;
            submissions.push(submission);
        }

        Ok(submissions)
    }
}

#[derive(Debug, Deserialize)]
struct PatientRow {
    name: String,
    age: i32,
    gender: String,
    chest_pain_type: String,
    resting_bp: i32,
    cholesterol: i32,
    fasting_bs: bool,
    resting_ecg: String,
    max_heart_rate: i32,
    exercise_angina: bool,
    oldpeak: f64,
    st_slope: String,
    smoking: bool,
    diabetes: bool,
    family_history: bool,
}

impl PatientRow {
    fn into_submission(self) -> Result<PatientSubmission, InvalidFieldError> {
        let record = ClinicalRecord {
            age: self.age,
            gender: self.gender.parse()?,
            chest_pain_type: self.chest_pain_type.parse()?,
            resting_bp: self.resting_bp,
            cholesterol: self.cholesterol,
            fasting_bs: self.fasting_bs,
            resting_ecg: self.resting_ecg.parse()?,
            max_heart_rate: self.max_heart_rate,
            exercise_angina: self.exercise_angina,
            oldpeak: self.oldpeak,
            st_slope: self.st_slope.parse()?,
            smoking: self.smoking,
            diabetes: self.diabetes,
            family_history: self.family_history,
        };

        Ok(PatientSubmission {
            name: self.name,
            record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::domain::{ChestPainType, Gender, RestingEcg, StSlope};
    use std::io::Cursor;

    const HEADER: &str = "name,age,gender,chest_pain_type,resting_bp,cholesterol,fasting_bs,resting_ecg,max_heart_rate,exercise_angina,oldpeak,st_slope,smoking,diabetes,family_history\n";

    #[test]
    fn parses_rows_into_submissions() {
        let csv = format!(
            "{HEADER}Ada Lovelace,58,female,atypical,142,251,false,st-t-abnormality,150,false,1.4,flat,false,true,false\n\
             Alan Turing, 41 ,male,non-anginal,120,190,false,normal,175,false,0.0,up,true,false,true\n"
        );

        let submissions =
            CsvPatientImporter::from_reader(Cursor::new(csv.into_bytes())).expect("csv parses");

        assert_eq!(submissions.len(), 2);
        let first = &submissions[0];
        assert_eq!(first.name, "Ada Lovelace");
        assert_eq!(first.record.gender, Gender::Female);
        assert_eq!(first.record.chest_pain_type, ChestPainType::Atypical);
        assert_eq!(first.record.resting_ecg, RestingEcg::StTAbnormality);
        assert_eq!(first.record.st_slope, StSlope::Flat);
        assert!((first.record.oldpeak - 1.4).abs() < f64::EPSILON);
        assert!(first.record.diabetes);

        let second = &submissions[1];
        assert_eq!(second.record.age, 41);
        assert_eq!(second.record.chest_pain_type, ChestPainType::NonAnginal);
        assert!(second.record.smoking);
    }

    #[test]
    fn reports_row_number_for_unknown_labels() {
        let csv = format!(
            "{HEADER}Grace Hopper,66,female,typical,130,210,true,inverted,140,true,2.5,down,false,false,false\n"
        );

        let err = CsvPatientImporter::from_reader(Cursor::new(csv.into_bytes()))
            .expect_err("unknown ECG label rejected");

        match err {
            ImportError::InvalidField { row, source } => {
                assert_eq!(row, 2);
                assert_eq!(source.field(), "resting_ecg");
            }
            other => panic!("expected invalid field error, got {other:?}"),
        }
    }

    #[test]
    fn surfaces_malformed_numbers_as_csv_errors() {
        let csv = format!(
            "{HEADER}Edsger Dijkstra,sixty,male,typical,130,210,true,normal,140,true,2.5,down,false,false,false\n"
        );

        let err = CsvPatientImporter::from_reader(Cursor::new(csv.into_bytes()))
            .expect_err("non-numeric age rejected");

        assert!(matches!(err, ImportError::Csv(_)));
    }
}
