use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use truthguard_engine::{ClientSettings, OcrSettings};

use crate::cli::Cli;

/// Directory name used under the platform config dir.
const APP_DIR_NAME: &str = "truthguard";

/// Runtime settings resolved from flags and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server_url: Option<String>,
    pub request_timeout: Duration,
    pub tesseract: PathBuf,
    pub config_dir: PathBuf,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            server_url: cli
                .server_url
                .as_ref()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
            request_timeout: Duration::from_secs(cli.timeout_secs.max(1)),
            tesseract: cli.tesseract.clone(),
            config_dir: cli.config_dir.clone().unwrap_or_else(default_config_dir),
        }
    }

    pub fn client_settings(&self) -> Result<ClientSettings> {
        let Some(server_url) = &self.server_url else {
            bail!("no detection server configured; pass --server-url or set TRUTHGUARD_SERVER_URL");
        };
        Ok(ClientSettings {
            request_timeout: self.request_timeout,
            ..ClientSettings::new(server_url.clone())
        })
    }

    pub fn ocr_settings(&self) -> OcrSettings {
        OcrSettings {
            program: self.tesseract.clone(),
            ..OcrSettings::default()
        }
    }

    /// Longest the app waits for the engine to answer one call.
    pub fn call_deadline(&self) -> Duration {
        let ocr = OcrSettings::default().timeout;
        ocr.max(self.request_timeout) + Duration::from_secs(5)
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{APP_DIR_NAME}")))
}
