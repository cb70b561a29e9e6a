use crate::effect::{
    INFERENCE_FAILED_MESSAGE, NO_TEXT_MESSAGE, OCR_FAILED_MESSAGE, SCRAPE_FAILED_MESSAGE,
};
use crate::{Effect, InputMode, Msg, Notification, PendingCall, RequestId, SubmissionState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SubmissionState, msg: Msg) -> (SubmissionState, Vec<Effect>) {
    let effects = match msg {
        Msg::ModeSelected(mode) => {
            state.set_mode(mode);
            Vec::new()
        }
        Msg::TextChanged(text) => {
            state.set_text(text);
            Vec::new()
        }
        Msg::UrlChanged(url) => {
            state.set_url(url);
            Vec::new()
        }
        Msg::ImageSelected { file_name, bytes } => {
            // The upload control is disabled while anything is loading.
            if state.is_loading() {
                return (state, Vec::new());
            }
            state.set_text(String::new());
            let request_id = state.begin(PendingCall::Ocr);
            vec![Effect::ExtractText {
                request_id,
                file_name,
                image: bytes,
            }]
        }
        Msg::OcrProgress {
            request_id,
            status,
            progress,
        } => {
            if state.is_awaiting(request_id, PendingCall::Ocr) {
                state.set_ocr_status(status, progress);
            }
            Vec::new()
        }
        Msg::OcrFinished { request_id, result } => {
            if !state.is_awaiting(request_id, PendingCall::Ocr) {
                return (state, Vec::new());
            }
            state.finish();
            match result {
                Ok(text) => {
                    state.set_text(text);
                    Vec::new()
                }
                Err(_) => vec![Effect::Notify(Notification::error(OCR_FAILED_MESSAGE))],
            }
        }
        Msg::DetectClicked => {
            if state.is_loading() || state.is_detect_disabled() {
                return (state, Vec::new());
            }
            state.clear_probability();
            match state.mode() {
                InputMode::Text | InputMode::Image => {
                    let request_id = state.begin(PendingCall::Predict);
                    let text = state.text().to_string();
                    predict_or_give_up(&mut state, request_id, text, Vec::new())
                }
                InputMode::Url => {
                    let request_id = state.begin(PendingCall::Scrape);
                    vec![Effect::ScrapeUrl {
                        request_id,
                        url: state.url().to_string(),
                    }]
                }
            }
        }
        Msg::ScrapeFinished { request_id, result } => {
            if !state.is_awaiting(request_id, PendingCall::Scrape) {
                return (state, Vec::new());
            }
            state.advance(PendingCall::Predict);
            match result {
                Ok(text) => predict_or_give_up(&mut state, request_id, text, Vec::new()),
                // A failed scrape continues with empty text.
                Err(_) => predict_or_give_up(
                    &mut state,
                    request_id,
                    String::new(),
                    vec![Effect::Notify(Notification::error(SCRAPE_FAILED_MESSAGE))],
                ),
            }
        }
        Msg::PredictFinished { request_id, result } => {
            if !state.is_awaiting(request_id, PendingCall::Predict) {
                return (state, Vec::new());
            }
            state.finish();
            match result {
                Ok(probability) if is_valid_probability(probability) => {
                    state.set_probability(probability);
                    Vec::new()
                }
                Ok(_) | Err(_) => {
                    vec![Effect::Notify(Notification::error(INFERENCE_FAILED_MESSAGE))]
                }
            }
        }
        Msg::ThemeSelected(theme) => {
            state.set_theme(theme);
            vec![Effect::PersistTheme(theme)]
        }
        Msg::ThemeRestored(theme) => {
            state.set_theme(theme);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn predict_or_give_up(
    state: &mut SubmissionState,
    request_id: RequestId,
    text: String,
    mut effects: Vec<Effect>,
) -> Vec<Effect> {
    if text.trim().is_empty() {
        state.finish();
        effects.push(Effect::Notify(Notification::error(NO_TEXT_MESSAGE)));
    } else {
        effects.push(Effect::Predict { request_id, text });
    }
    effects
}

fn is_valid_probability(probability: f64) -> bool {
    probability.is_finite() && (0.0..=1.0).contains(&probability)
}
