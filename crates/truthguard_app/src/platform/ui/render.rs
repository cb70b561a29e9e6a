use truthguard_core::{
    ConfidenceBand, InputMode, LoadingKind, Notification, NotificationLevel, ResultView,
    SubmissionViewModel, DISCLAIMER, GAUGE_SWEEP,
};

use super::palette::Palette;

/// Cells in the gauge and progress bars.
pub const BAR_WIDTH: usize = 30;
/// Input shown in the summary before it is cut off.
pub const PREVIEW_CHARS: usize = 70;

pub fn render(view: &SubmissionViewModel, palette: &Palette) -> String {
    let mut lines = vec![format!(
        "{} {} Mode: {} | Theme: {}",
        palette.accent("TruthGuard"),
        palette.muted("|"),
        view.mode.label(),
        view.theme.label()
    )];

    lines.push(match view.mode {
        InputMode::Text | InputMode::Image => format!("Text: {}", preview(&view.text)),
        InputMode::Url => format!("URL:  {}", preview(&view.url)),
    });

    if let Some(status) = status_line(view, palette) {
        lines.push(status);
    } else if let Some(result) = &view.result {
        lines.extend(result_lines(result, palette));
    } else if !view.detect_enabled {
        lines.push(palette.muted("Detect is disabled until the input is filled in."));
    }

    lines.push(palette.muted(DISCLAIMER));
    lines.join("\n")
}

/// One-line progress shown while a call is in flight.
pub fn status_line(view: &SubmissionViewModel, palette: &Palette) -> Option<String> {
    match view.loading {
        LoadingKind::None => None,
        LoadingKind::Extracting => Some(match &view.ocr {
            Some(ocr) => format!(
                "{} [{}] {:>3}%",
                ocr.label,
                palette.accent(&bar(ocr.progress)),
                ocr.percent()
            ),
            None => "Extracting text...".to_string(),
        }),
        LoadingKind::Detecting => Some(format!(
            "Detecting... {}",
            view.busy_banner().unwrap_or_default()
        )),
    }
}

pub fn notification(notification: &Notification, palette: &Palette) -> String {
    match notification.level {
        NotificationLevel::Error => format!("{} {}", palette.error("error:"), notification.message),
        NotificationLevel::Info => format!("{} {}", palette.accent("info:"), notification.message),
    }
}

fn result_lines(result: &ResultView, palette: &Palette) -> Vec<String> {
    let headline = format!("{} {}%", result.verdict.label(), result.percent);
    vec![
        format!("Result: {}", palette.band(result.band, &headline)),
        format!(
            "Gauge:  [{}] {} confidence",
            palette.band(result.band, &bar(result.gauge_fill / GAUGE_SWEEP)),
            band_label(result.band)
        ),
    ]
}

fn band_label(band: ConfidenceBand) -> &'static str {
    match band {
        ConfidenceBand::Low => "low",
        ConfidenceBand::Mid => "mid",
        ConfidenceBand::High => "high",
    }
}

fn bar(fraction: f64) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn preview(input: &str) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "(empty)".to_string();
    }
    match collapsed.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &collapsed[..idx]),
        None => collapsed,
    }
}
