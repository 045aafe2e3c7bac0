use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Empty { field: &'static str },
    EmptyRecipient { position: usize },
    SimSlotOutOfRange { min: u8, max: u8, actual: u8 },
    InvalidServerAddress { input: String, reason: String },
    InvalidBackoffFactor { actual: f64 },
    InvalidTimeout { actual: f64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::EmptyRecipient { position } => {
                write!(f, "recipient #{position} is empty")
            }
            Self::SimSlotOutOfRange { min, max, actual } => {
                write!(f, "sim slot out of range: {actual} (expected {min}..={max})")
            }
            Self::InvalidServerAddress { input, reason } => {
                write!(f, "invalid server address {input:?}: {reason}")
            }
            Self::InvalidBackoffFactor { actual } => {
                write!(
                    f,
                    "backoff factor must be a finite non-negative number, got {actual}"
                )
            }
            Self::InvalidTimeout { actual } => {
                write!(f, "timeout must be a positive number of seconds, got {actual}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
