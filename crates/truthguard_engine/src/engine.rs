use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use guard_logging::{guard_debug, guard_warn};

use crate::client::DetectorClient;
use crate::ocr::{ChannelProgressSink, OcrEngine};
use crate::{EngineEvent, RequestId};

enum EngineCommand {
    Extract {
        request_id: RequestId,
        image: Vec<u8>,
    },
    Scrape {
        request_id: RequestId,
        url: String,
    },
    Predict {
        request_id: RequestId,
        text: String,
    },
}

/// Runs OCR and server calls on a background tokio runtime.
///
/// Every command answers with exactly one completion event; OCR commands may
/// emit progress events before it.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(
        client: Arc<dyn DetectorClient>,
        ocr: Arc<dyn OcrEngine>,
    ) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("truthguard-engine")
            .build()?;

        thread::Builder::new()
            .name("truthguard-engine-commands".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let ocr = ocr.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), ocr.as_ref(), command, event_tx).await;
                    });
                }
                guard_debug!("engine command channel closed; shutting down runtime");
                runtime.shutdown_timeout(Duration::from_secs(1));
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn extract_text(&self, request_id: RequestId, image: Vec<u8>) {
        self.send(EngineCommand::Extract { request_id, image });
    }

    pub fn scrape(&self, request_id: RequestId, url: impl Into<String>) {
        self.send(EngineCommand::Scrape {
            request_id,
            url: url.into(),
        });
    }

    pub fn predict(&self, request_id: RequestId, text: impl Into<String>) {
        self.send(EngineCommand::Predict {
            request_id,
            text: text.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            guard_warn!("engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    client: &dyn DetectorClient,
    ocr: &dyn OcrEngine,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::Extract { request_id, image } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = ocr.recognize(request_id, &image, &sink).await;
            if let Err(err) = &result {
                guard_warn!("OCR request {} failed: {}", request_id, err);
            }
            EngineEvent::OcrCompleted { request_id, result }
        }
        EngineCommand::Scrape { request_id, url } => {
            let result = client.scrape(&url).await;
            if let Err(err) = &result {
                guard_warn!("scrape request {} for {} failed: {}", request_id, url, err);
            }
            EngineEvent::ScrapeCompleted { request_id, result }
        }
        EngineCommand::Predict { request_id, text } => {
            let result = client.predict(&text).await;
            if let Err(err) = &result {
                guard_warn!("predict request {} failed: {}", request_id, err);
            }
            EngineEvent::PredictCompleted { request_id, result }
        }
    };
    let _ = event_tx.send(event);
}
