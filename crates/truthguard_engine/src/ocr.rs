use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use guard_logging::{guard_debug, guard_info, guard_warn};
use image::{ImageFormat, ImageReader};

use crate::{EngineEvent, OcrError, OcrProgress, RequestId};

pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

pub const STATUS_LOADING_IMAGE: &str = "loading image";
pub const STATUS_INITIALIZING: &str = "initializing api";
pub const STATUS_RECOGNIZING: &str = "recognizing text";

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Image formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => ".png",
            ImageKind::Jpeg => ".jpg",
        }
    }
}

/// Sniffs the image format from its magic bytes and validates the header.
pub fn sniff_image(bytes: &[u8]) -> Result<(ImageKind, (u32, u32)), OcrError> {
    let format = image::guess_format(bytes)
        .map_err(|err| OcrError::UnsupportedImage(err.to_string()))?;
    let kind = match format {
        ImageFormat::Png => ImageKind::Png,
        ImageFormat::Jpeg => ImageKind::Jpeg,
        other => {
            return Err(OcrError::UnsupportedImage(format!(
                "{other:?} (expected PNG or JPEG)"
            )))
        }
    };
    let dimensions = ImageReader::with_format(Cursor::new(bytes), format)
        .into_dimensions()
        .map_err(|err| OcrError::UnsupportedImage(err.to_string()))?;
    Ok((kind, dimensions))
}

#[async_trait::async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(
        &self,
        request_id: RequestId,
        image: &[u8],
        sink: &dyn ProgressSink,
    ) -> Result<String, OcrError>;
}

#[derive(Debug, Clone)]
pub struct OcrSettings {
    /// The `tesseract` executable, looked up on `PATH` when relative.
    pub program: PathBuf,
    pub language: String,
    pub timeout: Duration,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Runs the `tesseract` command line tool on a temporary copy of the image.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    settings: OcrSettings,
}

impl TesseractEngine {
    pub fn new(settings: OcrSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl OcrEngine for TesseractEngine {
    async fn recognize(
        &self,
        request_id: RequestId,
        image: &[u8],
        sink: &dyn ProgressSink,
    ) -> Result<String, OcrError> {
        let report = |status: &str, progress: f64| {
            sink.emit(EngineEvent::OcrProgress(OcrProgress {
                request_id,
                status: status.to_string(),
                progress,
            }));
        };

        report(STATUS_LOADING_IMAGE, 0.0);
        let (kind, (width, height)) = sniff_image(image)?;
        guard_debug!(
            "OCR request {} image {:?} {}x{} ({} bytes)",
            request_id,
            kind,
            width,
            height,
            image.len()
        );

        let mut file = tempfile::Builder::new()
            .prefix("truthguard-ocr-")
            .suffix(kind.extension())
            .tempfile()?;
        file.write_all(image)?;
        file.flush()?;
        report(STATUS_LOADING_IMAGE, 1.0);

        report(STATUS_INITIALIZING, 0.0);
        let program = self.settings.program.display().to_string();
        let child = tokio::process::Command::new(&self.settings.program)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.settings.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| OcrError::EngineUnavailable {
                program: program.clone(),
                message: err.to_string(),
            })?;
        report(STATUS_INITIALIZING, 1.0);

        report(STATUS_RECOGNIZING, 0.0);
        let output = tokio::time::timeout(self.settings.timeout, child.wait_with_output())
            .await
            .map_err(|_| OcrError::Timeout {
                seconds: self.settings.timeout.as_secs(),
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            guard_warn!("{} failed for request {}: {}", program, request_id, stderr);
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr,
            });
        }
        report(STATUS_RECOGNIZING, 1.0);

        // Tesseract ends every page with a form feed.
        let text = String::from_utf8_lossy(&output.stdout)
            .trim_end_matches(|c: char| c == '\u{c}' || c.is_whitespace())
            .to_string();
        guard_info!(
            "OCR request {} extracted {} chars",
            request_id,
            text.chars().count()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{sniff_image, ImageKind};
    use crate::OcrError;

    // 1x1 RGBA PNG.
    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x64,
        0x60, 0xF8, 0x5F, 0x0F, 0x00, 0x02, 0x87, 0x01, 0x80, 0xEB, 0x47, 0xBA, 0x92, 0x00, 0x00,
        0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn png_is_accepted_with_dimensions() {
        let (kind, dims) = sniff_image(PNG_1X1).unwrap();
        assert_eq!(kind, ImageKind::Png);
        assert_eq!(dims, (1, 1));
    }

    #[test]
    fn gif_is_rejected() {
        let err = sniff_image(b"GIF89a\x01\x00\x01\x00\x00\x00\x00").unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedImage(_)));
    }

    #[test]
    fn random_bytes_are_rejected() {
        let err = sniff_image(b"definitely not an image").unwrap_err();
        assert!(matches!(err, OcrError::UnsupportedImage(_)));
    }
}
