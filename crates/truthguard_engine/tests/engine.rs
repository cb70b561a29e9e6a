use std::sync::Arc;
use std::time::Duration;

use truthguard_engine::{
    DetectorClient, EngineEvent, EngineHandle, FailureKind, OcrEngine, OcrError, OcrProgress,
    ProgressSink, RequestId, ServiceError,
};

const WAIT: Duration = Duration::from_secs(5);

struct FakeClient;

#[async_trait::async_trait]
impl DetectorClient for FakeClient {
    async fn scrape(&self, url: &str) -> Result<String, ServiceError> {
        if url.contains("broken") {
            return Err(ServiceError::new(FailureKind::HttpStatus(502), "Bad Gateway"));
        }
        Ok(format!("text of {url}"))
    }

    async fn predict(&self, text: &str) -> Result<f64, ServiceError> {
        Ok(text.len() as f64 / 100.0)
    }
}

struct FakeOcr;

#[async_trait::async_trait]
impl OcrEngine for FakeOcr {
    async fn recognize(
        &self,
        request_id: RequestId,
        image: &[u8],
        sink: &dyn ProgressSink,
    ) -> Result<String, OcrError> {
        sink.emit(EngineEvent::OcrProgress(OcrProgress {
            request_id,
            status: "recognizing text".to_string(),
            progress: 0.5,
        }));
        if image.is_empty() {
            return Err(OcrError::UnsupportedImage("empty".to_string()));
        }
        Ok(String::from_utf8_lossy(image).into_owned())
    }
}

fn engine() -> EngineHandle {
    EngineHandle::new(Arc::new(FakeClient), Arc::new(FakeOcr)).expect("engine starts")
}

#[test]
fn predict_answers_with_one_completion() {
    let engine = engine();
    engine.predict(4, "0123456789");

    let event = engine.recv_timeout(WAIT).expect("completion");
    assert_eq!(
        event,
        EngineEvent::PredictCompleted {
            request_id: 4,
            result: Ok(0.1),
        }
    );
    assert!(engine.recv_timeout(Duration::from_millis(50)).is_none());
}

#[test]
fn scrape_success_and_failure_carry_request_ids() {
    let engine = engine();
    engine.scrape(1, "https://ok.example");

    let event = engine.recv_timeout(WAIT).expect("completion");
    assert_eq!(
        event,
        EngineEvent::ScrapeCompleted {
            request_id: 1,
            result: Ok("text of https://ok.example".to_string()),
        }
    );

    engine.scrape(2, "https://broken.example");
    match engine.recv_timeout(WAIT).expect("completion") {
        EngineEvent::ScrapeCompleted {
            request_id: 2,
            result: Err(err),
        } => assert_eq!(err.kind, FailureKind::HttpStatus(502)),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn ocr_progress_precedes_completion() {
    let engine = engine();
    engine.extract_text(9, b"Headline".to_vec());

    let first = engine.recv_timeout(WAIT).expect("progress");
    assert!(matches!(
        first,
        EngineEvent::OcrProgress(OcrProgress { request_id: 9, .. })
    ));

    let second = engine.recv_timeout(WAIT).expect("completion");
    assert_eq!(
        second,
        EngineEvent::OcrCompleted {
            request_id: 9,
            result: Ok("Headline".to_string()),
        }
    );
}

#[test]
fn ocr_failure_is_delivered_as_completion() {
    let engine = engine();
    engine.extract_text(3, Vec::new());

    let mut completion = None;
    while let Some(event) = engine.recv_timeout(WAIT) {
        if let EngineEvent::OcrCompleted { .. } = event {
            completion = Some(event);
            break;
        }
    }
    assert!(matches!(
        completion,
        Some(EngineEvent::OcrCompleted {
            request_id: 3,
            result: Err(OcrError::UnsupportedImage(_)),
        })
    ));
}
