use super::domain::{ClinicalRecord, PatientSubmission};

/// A record field holds a value outside its physically meaningful domain.
///
/// Values past the intake form's clinical ranges are not errors here; only values
/// the engine cannot give a meaning to are rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidFieldError {
    #[error("{field} must be {requirement} (found {value})")]
    OutOfDomain {
        field: &'static str,
        requirement: &'static str,
        value: String,
    },
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("unrecognized {field} value '{value}'")]
    UnrecognizedValue { field: &'static str, value: String },
}

impl InvalidFieldError {
    pub(crate) fn unrecognized(field: &'static str, value: &str) -> Self {
        Self::UnrecognizedValue {
            field,
            value: value.to_string(),
        }
    }

    /// Name of the offending record field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::OutOfDomain { field, .. }
            | Self::NonFinite { field }
            | Self::UnrecognizedValue { field, .. } => field,
        }
    }
}

/// Intake errors for a full submission (patient name plus record).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmissionError {
    #[error("patient name is required")]
    MissingName,
    #[error(transparent)]
    InvalidField(#[from] InvalidFieldError),
}

/// Reject a record the engine cannot score meaningfully. Never coerces.
pub fn validate(record: &ClinicalRecord) -> Result<(), InvalidFieldError> {
    if record.age < 0 {
        return Err(out_of_domain("age", "zero or greater", record.age));
    }

    if record.resting_bp <= 0 {
        return Err(out_of_domain(
            "resting_bp",
            "greater than zero",
            record.resting_bp,
        ));
    }

    if record.cholesterol <= 0 {
        return Err(out_of_domain(
            "cholesterol",
            "greater than zero",
            record.cholesterol,
        ));
    }

    if record.max_heart_rate <= 0 {
        return Err(out_of_domain(
            "max_heart_rate",
            "greater than zero",
            record.max_heart_rate,
        ));
    }

    if !record.oldpeak.is_finite() {
        return Err(InvalidFieldError::NonFinite { field: "oldpeak" });
    }

    Ok(())
}

pub fn validate_submission(submission: &PatientSubmission) -> Result<(), SubmissionError> {
    if submission.name.trim().is_empty() {
        return Err(SubmissionError::MissingName);
    }

    validate(&submission.record)?;
    Ok(())
}

fn out_of_domain(field: &'static str, requirement: &'static str, value: i32) -> InvalidFieldError {
    InvalidFieldError::OutOfDomain {
        field,
        requirement,
        value: value.to_string(),
    }
}
