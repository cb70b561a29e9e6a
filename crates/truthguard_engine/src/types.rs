use std::fmt;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct OcrProgress {
    pub request_id: RequestId,
    /// Engine stage, e.g. `recognizing text`.
    pub status: String,
    /// Fraction of the current stage, 0..=1.
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    OcrProgress(OcrProgress),
    OcrCompleted {
        request_id: RequestId,
        result: Result<String, OcrError>,
    },
    ScrapeCompleted {
        request_id: RequestId,
        result: Result<String, ServiceError>,
    },
    PredictCompleted {
        request_id: RequestId,
        result: Result<f64, ServiceError>,
    },
}

/// Failure of a call to the scrape or inference endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidServerUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedResponse,
    ProbabilityOutOfRange,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidServerUrl => write!(f, "invalid server url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::ProbabilityOutOfRange => write!(f, "probability out of range"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OcrError {
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),
    #[error("could not start OCR engine `{program}`: {message}")]
    EngineUnavailable { program: String, message: String },
    #[error("OCR engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },
    #[error("OCR engine timed out after {seconds}s")]
    Timeout { seconds: u64 },
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for OcrError {
    fn from(err: std::io::Error) -> Self {
        OcrError::Io(err.to_string())
    }
}
