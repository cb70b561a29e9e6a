use crate::view_model::{OcrStatusView, ResultView, SubmissionViewModel};

pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Text,
    Url,
    Image,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            InputMode::Text => "Text",
            InputMode::Url => "URL",
            InputMode::Image => "Image",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingKind {
    #[default]
    None,
    Extracting,
    Detecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    /// Case-insensitive parse of a theme label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.label().eq_ignore_ascii_case(label.trim()))
    }
}

/// External call the state machine is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCall {
    Ocr,
    Scrape,
    Predict,
}

impl PendingCall {
    fn loading_kind(self) -> LoadingKind {
        match self {
            PendingCall::Ocr => LoadingKind::Extracting,
            PendingCall::Scrape | PendingCall::Predict => LoadingKind::Detecting,
        }
    }
}

/// Latest progress report of the OCR engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrStatus {
    pub status: String,
    pub progress: f64,
}

/// State of the submission form.
///
/// At most one external call is tracked at a time; the loading kind is
/// derived from it, so Extracting and Detecting can never overlap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionState {
    mode: InputMode,
    raw_text: String,
    raw_url: String,
    probability: Option<f64>,
    pending: Option<(RequestId, PendingCall)>,
    ocr_status: Option<OcrStatus>,
    theme: Theme,
    next_request_id: RequestId,
    dirty: bool,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SubmissionViewModel {
        SubmissionViewModel {
            mode: self.mode,
            text: self.raw_text.clone(),
            url: self.raw_url.clone(),
            detect_enabled: !self.is_detect_disabled(),
            loading: self.loading(),
            ocr: self.ocr_status.as_ref().map(OcrStatusView::from_status),
            result: self.probability.map(ResultView::from_probability),
            theme: self.theme,
            dirty: self.dirty,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.raw_text
    }

    pub fn url(&self) -> &str {
        &self.raw_url
    }

    pub fn probability(&self) -> Option<f64> {
        self.probability
    }

    pub fn loading(&self) -> LoadingKind {
        self.pending
            .map_or(LoadingKind::None, |(_, call)| call.loading_kind())
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn active_request(&self) -> Option<RequestId> {
        self.pending.map(|(request_id, _)| request_id)
    }

    pub fn pending_call(&self) -> Option<PendingCall> {
        self.pending.map(|(_, call)| call)
    }

    /// Detect is disabled when the active mode's input is empty or whitespace.
    pub fn is_detect_disabled(&self) -> bool {
        match self.mode {
            InputMode::Text | InputMode::Image => self.raw_text.trim().is_empty(),
            InputMode::Url => self.raw_url.trim().is_empty(),
        }
    }

    /// Returns whether the view changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_mode(&mut self, mode: InputMode) {
        if self.mode != mode {
            self.mode = mode;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        if self.raw_text != text {
            self.raw_text = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_url(&mut self, url: String) {
        if self.raw_url != url {
            self.raw_url = url;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_theme(&mut self, theme: Theme) {
        if self.theme != theme {
            self.theme = theme;
            self.mark_dirty();
        }
    }

    /// Enters a loading phase and returns the id of the call it tracks.
    pub(crate) fn begin(&mut self, call: PendingCall) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.pending = Some((request_id, call));
        self.mark_dirty();
        request_id
    }

    /// Moves the active request on to its next call, keeping its id.
    pub(crate) fn advance(&mut self, call: PendingCall) {
        if let Some((_, pending)) = self.pending.as_mut() {
            *pending = call;
        }
    }

    /// Returns to the idle, retryable state.
    pub(crate) fn finish(&mut self) {
        self.pending = None;
        self.ocr_status = None;
        self.mark_dirty();
    }

    pub(crate) fn is_awaiting(&self, request_id: RequestId, call: PendingCall) -> bool {
        self.pending == Some((request_id, call))
    }

    pub(crate) fn clear_probability(&mut self) {
        self.probability = None;
        self.mark_dirty();
    }

    pub(crate) fn set_probability(&mut self, probability: f64) {
        self.probability = Some(probability);
        self.mark_dirty();
    }

    pub(crate) fn set_ocr_status(&mut self, status: String, progress: f64) {
        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.ocr_status = Some(OcrStatus { status, progress });
        self.mark_dirty();
    }
}
