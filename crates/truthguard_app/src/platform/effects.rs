use std::sync::Arc;
use std::time::Duration;

use guard_logging::{guard_error, guard_info};
use truthguard_core::{Effect, Msg, Notification};
use truthguard_engine::{
    DetectorClient, EngineEvent, EngineHandle, OcrEngine, PreferenceStore,
};

use super::persistence;

/// Executes the effects emitted by `update` and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    store: PreferenceStore,
}

impl EffectRunner {
    pub fn new(
        client: Arc<dyn DetectorClient>,
        ocr: Arc<dyn OcrEngine>,
        store: PreferenceStore,
    ) -> std::io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(client, ocr)?,
            store,
        })
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    /// Runs `effects` in order and returns the notifications to show.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for effect in effects {
            match effect {
                Effect::ExtractText {
                    request_id,
                    file_name,
                    image,
                } => {
                    guard_info!(
                        "ExtractText request_id={} file={} bytes={}",
                        request_id,
                        file_name,
                        image.len()
                    );
                    self.engine.extract_text(request_id, image);
                }
                Effect::ScrapeUrl { request_id, url } => {
                    guard_info!("ScrapeUrl request_id={} url={}", request_id, url);
                    self.engine.scrape(request_id, url);
                }
                Effect::Predict { request_id, text } => {
                    guard_info!(
                        "Predict request_id={} text_len={}",
                        request_id,
                        text.chars().count()
                    );
                    self.engine.predict(request_id, text);
                }
                Effect::Notify(notification) => notifications.push(notification),
                Effect::PersistTheme(theme) => {
                    match persistence::save_theme(&self.store, theme) {
                        Ok(_) => notifications
                            .push(Notification::info(format!("Theme set to {}", theme.label()))),
                        Err(err) => {
                            guard_error!("Failed to save theme {}: {}", theme.label(), err);
                            notifications.push(Notification::error(format!(
                                "Could not save theme: {err}"
                            )));
                        }
                    }
                }
            }
        }
        notifications
    }

    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::OcrProgress(progress) => Msg::OcrProgress {
            request_id: progress.request_id,
            status: progress.status,
            progress: progress.progress,
        },
        EngineEvent::OcrCompleted { request_id, result } => Msg::OcrFinished {
            request_id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ScrapeCompleted { request_id, result } => Msg::ScrapeFinished {
            request_id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::PredictCompleted { request_id, result } => Msg::PredictFinished {
            request_id,
            result: result.map_err(|err| err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use truthguard_core::Msg;
    use truthguard_engine::{
        EngineEvent, FailureKind, OcrError, OcrProgress, ServiceError,
    };

    use super::map_event;

    #[test]
    fn progress_keeps_stage_and_fraction() {
        let msg = map_event(EngineEvent::OcrProgress(OcrProgress {
            request_id: 3,
            status: "recognizing text".to_string(),
            progress: 0.5,
        }));
        assert_eq!(
            msg,
            Msg::OcrProgress {
                request_id: 3,
                status: "recognizing text".to_string(),
                progress: 0.5,
            }
        );
    }

    #[test]
    fn failures_become_descriptions() {
        let msg = map_event(EngineEvent::PredictCompleted {
            request_id: 8,
            result: Err(ServiceError::new(FailureKind::HttpStatus(503), "busy")),
        });
        assert_eq!(
            msg,
            Msg::PredictFinished {
                request_id: 8,
                result: Err("http status 503: busy".to_string()),
            }
        );

        let msg = map_event(EngineEvent::OcrCompleted {
            request_id: 2,
            result: Err(OcrError::Timeout { seconds: 120 }),
        });
        assert!(matches!(
            msg,
            Msg::OcrFinished {
                request_id: 2,
                result: Err(_)
            }
        ));
    }

    #[test]
    fn scrape_text_passes_through() {
        let msg = map_event(EngineEvent::ScrapeCompleted {
            request_id: 1,
            result: Ok("body".to_string()),
        });
        assert_eq!(
            msg,
            Msg::ScrapeFinished {
                request_id: 1,
                result: Ok("body".to_string()),
            }
        );
    }
}
