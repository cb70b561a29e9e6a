use crate::{RequestId, Theme};

pub const OCR_FAILED_MESSAGE: &str = "Something went wrong. Please try again later.";
pub const SCRAPE_FAILED_MESSAGE: &str = "Could not fetch article text";
pub const NO_TEXT_MESSAGE: &str = "No text to analyze";
pub const INFERENCE_FAILED_MESSAGE: &str = "Inference failed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ExtractText {
        request_id: RequestId,
        file_name: String,
        image: Vec<u8>,
    },
    ScrapeUrl {
        request_id: RequestId,
        url: String,
    },
    Predict {
        request_id: RequestId,
        text: String,
    },
    Notify(Notification),
    PersistTheme(Theme),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Transient user-facing message; the toast of a graphical front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}
