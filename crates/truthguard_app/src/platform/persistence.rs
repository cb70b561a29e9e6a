use std::path::PathBuf;

use guard_logging::{guard_info, guard_warn};
use truthguard_core::Theme;
use truthguard_engine::{PreferenceError, PreferenceStore, Preferences, ThemePreference};

/// Loads the saved theme; unreadable preferences fall back to the default.
pub(crate) fn load_theme(store: &PreferenceStore) -> Theme {
    match store.load() {
        Ok(preferences) => {
            let theme = from_preference(preferences.theme);
            guard_info!("Loaded theme {} from {:?}", theme.label(), store.path());
            theme
        }
        Err(err) => {
            guard_warn!("Failed to load preferences from {:?}: {}", store.path(), err);
            Theme::default()
        }
    }
}

pub(crate) fn save_theme(store: &PreferenceStore, theme: Theme) -> Result<PathBuf, PreferenceError> {
    store.save(&Preferences {
        theme: to_preference(theme),
    })
}

fn to_preference(theme: Theme) -> ThemePreference {
    match theme {
        Theme::Light => ThemePreference::Light,
        Theme::Dark => ThemePreference::Dark,
        Theme::System => ThemePreference::System,
    }
}

fn from_preference(preference: ThemePreference) -> Theme {
    match preference {
        ThemePreference::Light => Theme::Light,
        ThemePreference::Dark => Theme::Dark,
        ThemePreference::System => Theme::System,
    }
}
