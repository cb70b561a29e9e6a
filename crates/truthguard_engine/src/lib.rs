//! TruthGuard engine: server calls, OCR and effect execution.
mod client;
mod engine;
mod ocr;
mod preferences;
mod types;

pub use client::{ClientSettings, DetectorClient, ReqwestDetectorClient, PREDICT_PATH, SCRAPE_PATH};
pub use engine::EngineHandle;
pub use ocr::{
    sniff_image, ChannelProgressSink, ImageKind, OcrEngine, OcrSettings, ProgressSink,
    TesseractEngine, DEFAULT_OCR_LANGUAGE, STATUS_INITIALIZING, STATUS_LOADING_IMAGE,
    STATUS_RECOGNIZING,
};
pub use preferences::{
    PreferenceError, PreferenceStore, Preferences, ThemePreference, PREFERENCES_FILENAME,
};
pub use types::{EngineEvent, FailureKind, OcrError, OcrProgress, RequestId, ServiceError};
