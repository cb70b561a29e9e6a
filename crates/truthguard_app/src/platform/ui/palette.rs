use std::io::IsTerminal;

use truthguard_core::{ConfidenceBand, Theme};

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

/// Resolves `System` from `COLORFGBG` ("fg;bg"). Backgrounds 0-6 and 8 are
/// dark; an unknown background counts as dark.
pub fn resolve_theme(theme: Theme, colorfgbg: Option<&str>) -> ResolvedTheme {
    match theme {
        Theme::Light => ResolvedTheme::Light,
        Theme::Dark => ResolvedTheme::Dark,
        Theme::System => colorfgbg
            .and_then(|value| value.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok())
            .map(|bg| {
                if bg <= 6 || bg == 8 {
                    ResolvedTheme::Dark
                } else {
                    ResolvedTheme::Light
                }
            })
            .unwrap_or(ResolvedTheme::Dark),
    }
}

/// ANSI styling for one resolved theme, or none at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
    low: &'static str,
    mid: &'static str,
    high: &'static str,
    accent: &'static str,
    muted: &'static str,
    error: &'static str,
}

impl Palette {
    pub fn for_theme(theme: ResolvedTheme) -> Self {
        match theme {
            ResolvedTheme::Dark => Self {
                enabled: true,
                low: "\x1b[91m",
                mid: "\x1b[93m",
                high: "\x1b[92m",
                accent: "\x1b[96m",
                muted: "\x1b[90m",
                error: "\x1b[1;91m",
            },
            ResolvedTheme::Light => Self {
                enabled: true,
                low: "\x1b[31m",
                mid: "\x1b[33m",
                high: "\x1b[32m",
                accent: "\x1b[34m",
                muted: "\x1b[2m",
                error: "\x1b[1;31m",
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::for_theme(ResolvedTheme::Dark)
        }
    }

    /// Palette for stdout: plain when piped or when `NO_COLOR` is set.
    pub fn detect(theme: Theme) -> Self {
        if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
            return Self::plain();
        }
        let colorfgbg = std::env::var("COLORFGBG").ok();
        Self::for_theme(resolve_theme(theme, colorfgbg.as_deref()))
    }

    pub fn band(&self, band: ConfidenceBand, text: &str) -> String {
        let code = match band {
            ConfidenceBand::Low => self.low,
            ConfidenceBand::Mid => self.mid,
            ConfidenceBand::High => self.high,
        };
        self.paint(code, text)
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(self.accent, text)
    }

    pub fn muted(&self, text: &str) -> String {
        self.paint(self.muted, text)
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(self.error, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
