use crate::{InputMode, LoadingKind, OcrStatus, Theme};

/// Shown while a detection is in flight.
pub const ESTIMATED_DETECT_SECONDS: u32 = 10;

pub const DISCLAIMER: &str =
    "TruthGuard is an AI tool. Always verify information from multiple sources.";

/// Share of a full circle covered by the result gauge, in percent.
pub const GAUGE_SWEEP: f64 = 75.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionViewModel {
    pub mode: InputMode,
    pub text: String,
    pub url: String,
    pub detect_enabled: bool,
    pub loading: LoadingKind,
    pub ocr: Option<OcrStatusView>,
    pub result: Option<ResultView>,
    pub theme: Theme,
    pub dirty: bool,
}

impl SubmissionViewModel {
    pub fn is_loading(&self) -> bool {
        self.loading != LoadingKind::None
    }

    pub fn busy_banner(&self) -> Option<String> {
        match self.loading {
            LoadingKind::Detecting => Some(format!(
                "Estimated Time: {ESTIMATED_DETECT_SECONDS} seconds"
            )),
            LoadingKind::Extracting | LoadingKind::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OcrStatusView {
    /// Engine stage, title-cased for display.
    pub label: String,
    pub progress: f64,
}

impl OcrStatusView {
    pub(crate) fn from_status(status: &OcrStatus) -> Self {
        Self {
            label: title_case(&status.status),
            progress: status.progress,
        }
    }

    pub fn percent(&self) -> u8 {
        percent(self.progress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    Low,
    Mid,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Fake,
    Real,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Fake => "Fake",
            Verdict::Real => "Real",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub probability: f64,
    pub percent: u8,
    pub band: ConfidenceBand,
    pub verdict: Verdict,
    /// Filled share of the gauge out of 100.
    pub gauge_fill: f64,
}

impl ResultView {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            probability,
            percent: percent(probability),
            band: confidence_band(probability),
            verdict: verdict(probability),
            gauge_fill: probability * GAUGE_SWEEP,
        }
    }
}

pub fn confidence_band(probability: f64) -> ConfidenceBand {
    if probability < 0.4 {
        ConfidenceBand::Low
    } else if probability < 0.7 {
        ConfidenceBand::Mid
    } else {
        ConfidenceBand::High
    }
}

pub fn verdict(probability: f64) -> Verdict {
    if probability > 0.5 {
        Verdict::Real
    } else {
        Verdict::Fake
    }
}

/// Rounded percentage of a 0..1 fraction, clamped to 0..=100.
pub fn percent(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Upper-cases the first ASCII word character of every word.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_is_word = false;
    for ch in input.chars() {
        let is_word = ch.is_ascii_alphanumeric() || ch == '_';
        if is_word && !prev_is_word {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        prev_is_word = is_word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{percent, title_case};

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("recognizing text"), "Recognizing Text");
        assert_eq!(title_case("loading tesseract core"), "Loading Tesseract Core");
        assert_eq!(title_case("initialized-api"), "Initialized-Api");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn percent_rounds_and_clamps() {
        assert_eq!(percent(0.0), 0);
        assert_eq!(percent(0.424), 42);
        assert_eq!(percent(0.426), 43);
        assert_eq!(percent(1.0), 100);
        assert_eq!(percent(1.7), 100);
        assert_eq!(percent(-0.2), 0);
    }
}
