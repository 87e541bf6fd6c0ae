/// Rejection of a malformed asset or invalid engine settings
///
/// Raised at load time; a session is never created from input that fails here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Duration must be positive and finite, got {0}")]
    InvalidDuration(f64),

    #[error("Empty id on {0}")]
    EmptyId(&'static str),

    #[error("Duplicate event id: {0}")]
    DuplicateId(String),

    #[error("Timestamp {timestamp} of '{id}' is outside [0, {duration}]")]
    TimestampOutOfRange {
        id: String,
        timestamp: f64,
        duration: f64,
    },

    #[error("Tolerance {tolerance} of question '{id}' must be finite and non-negative")]
    InvalidTolerance { id: String, tolerance: f64 },

    #[error("Correct index {index} of question '{id}' is out of range for {options} option(s)")]
    CorrectIndexOutOfRange {
        id: String,
        index: usize,
        options: usize,
    },

    #[error("Time limit {seconds} of question '{id}' must be positive and at most one day")]
    InvalidTimeLimit { id: String, seconds: f64 },

    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}
