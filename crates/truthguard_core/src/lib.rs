//! TruthGuard core: pure submission state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{
    Effect, Notification, NotificationLevel, INFERENCE_FAILED_MESSAGE, NO_TEXT_MESSAGE,
    OCR_FAILED_MESSAGE, SCRAPE_FAILED_MESSAGE,
};
pub use msg::Msg;
pub use state::{
    InputMode, LoadingKind, OcrStatus, PendingCall, RequestId, SubmissionState, Theme,
};
pub use update::update;
pub use view_model::{
    confidence_band, percent, title_case, verdict, ConfidenceBand, OcrStatusView, ResultView,
    SubmissionViewModel, Verdict, DISCLAIMER, ESTIMATED_DETECT_SECONDS, GAUGE_SWEEP,
};
