use std::io::Cursor;
use std::sync::Mutex;

use image::{ImageFormat, RgbImage};
use truthguard_engine::{
    EngineEvent, OcrEngine, OcrError, OcrSettings, ProgressSink, TesseractEngine,
    STATUS_INITIALIZING, STATUS_LOADING_IMAGE, STATUS_RECOGNIZING,
};

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl RecordingSink {
    fn statuses(&self) -> Vec<(String, f64)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::OcrProgress(p) => Some((p.status.clone(), p.progress)),
                _ => None,
            })
            .collect()
    }
}

fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(4, 3, image::Rgb([255, 255, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

#[tokio::test]
async fn unsupported_image_fails_before_spawning() {
    let engine = TesseractEngine::new(OcrSettings {
        program: "/nonexistent/truthguard-tesseract".into(),
        ..OcrSettings::default()
    });
    let sink = RecordingSink::default();

    let err = engine
        .recognize(1, b"GIF89a not really", &sink)
        .await
        .unwrap_err();

    assert!(matches!(err, OcrError::UnsupportedImage(_)));
    assert_eq!(sink.statuses(), vec![(STATUS_LOADING_IMAGE.to_string(), 0.0)]);
}

#[tokio::test]
async fn missing_program_is_reported_as_unavailable() {
    let engine = TesseractEngine::new(OcrSettings {
        program: "/nonexistent/truthguard-tesseract".into(),
        ..OcrSettings::default()
    });
    let sink = RecordingSink::default();

    let err = engine.recognize(2, &png_bytes(), &sink).await.unwrap_err();

    match err {
        OcrError::EngineUnavailable { program, .. } => {
            assert!(program.contains("truthguard-tesseract"));
        }
        other => panic!("expected EngineUnavailable, got {other:?}"),
    }
}

#[cfg(unix)]
mod fake_tesseract {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use super::*;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("fake-tesseract");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn recognized_text_is_trimmed_and_progress_reported() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(
            dir.path(),
            r#"case "$2" in stdout) ;; *) exit 3 ;; esac
printf 'BREAKING: Aliens land\n\n\f'"#,
        );
        let engine = TesseractEngine::new(OcrSettings {
            program,
            ..OcrSettings::default()
        });
        let sink = RecordingSink::default();

        let text = engine.recognize(7, &png_bytes(), &sink).await.unwrap();

        assert_eq!(text, "BREAKING: Aliens land");
        let stages: Vec<String> = sink.statuses().into_iter().map(|(s, _)| s).collect();
        assert_eq!(
            stages,
            vec![
                STATUS_LOADING_IMAGE,
                STATUS_LOADING_IMAGE,
                STATUS_INITIALIZING,
                STATUS_INITIALIZING,
                STATUS_RECOGNIZING,
                STATUS_RECOGNIZING,
            ]
        );
        assert_eq!(sink.statuses().last().map(|(_, p)| *p), Some(1.0));
    }

    #[tokio::test]
    async fn failing_program_reports_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "echo 'Error opening data file' >&2\nexit 1");
        let engine = TesseractEngine::new(OcrSettings {
            program,
            ..OcrSettings::default()
        });
        let sink = RecordingSink::default();

        let err = engine.recognize(8, &png_bytes(), &sink).await.unwrap_err();

        match err {
            OcrError::EngineFailed { stderr, .. } => {
                assert_eq!(stderr, "Error opening data file");
            }
            other => panic!("expected EngineFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_program_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "sleep 5");
        let engine = TesseractEngine::new(OcrSettings {
            program,
            timeout: Duration::from_millis(100),
            ..OcrSettings::default()
        });
        let sink = RecordingSink::default();

        let err = engine.recognize(9, &png_bytes(), &sink).await.unwrap_err();
        assert!(matches!(err, OcrError::Timeout { .. }));
    }
}
