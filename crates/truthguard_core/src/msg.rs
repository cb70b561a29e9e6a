use crate::{InputMode, RequestId, Theme};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User switched between the Text, URL and Image tabs.
    ModeSelected(InputMode),
    /// User edited the article text box.
    TextChanged(String),
    /// User edited the article URL box.
    UrlChanged(String),
    /// User picked an image to run OCR on.
    ImageSelected { file_name: String, bytes: Vec<u8> },
    /// OCR engine progress for the active extraction.
    OcrProgress {
        request_id: RequestId,
        status: String,
        progress: f64,
    },
    /// OCR engine finished; `Err` carries a description for the log.
    OcrFinished {
        request_id: RequestId,
        result: Result<String, String>,
    },
    /// User clicked Detect.
    DetectClicked,
    /// Scrape endpoint answered (or failed) for the active detection.
    ScrapeFinished {
        request_id: RequestId,
        result: Result<String, String>,
    },
    /// Inference endpoint answered (or failed) for the active detection.
    PredictFinished {
        request_id: RequestId,
        result: Result<f64, String>,
    },
    /// User picked a theme; it gets persisted.
    ThemeSelected(Theme),
    /// Theme loaded from the preference file at startup.
    ThemeRestored(Theme),
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
