use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::device::{CaptureDevice, CaptureError, CaptureKind};

/// Finalized recording produced by a stopped capture
#[derive(Debug, Clone)]
pub struct RecordingArtifact {
    pub kind: CaptureKind,
    pub file_name: String,
    pub data: Vec<u8>,
}

impl RecordingArtifact {
    pub fn media_type(&self) -> &'static str {
        self.kind.media_type()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Inactive,
    Recording,
    Stopped,
}

/// Owned recording resource with a single forward lifecycle
///
/// `Inactive -> Recording -> Stopped`, one transition each. The first
/// `stop` materializes the buffered chunks into a `RecordingArtifact`;
/// any later call is a no-op, so every exit path may stop unconditionally
/// without leaking the underlying device.
pub struct CaptureHandle {
    kind: CaptureKind,
    state: CaptureState,
    stop_tx: Option<oneshot::Sender<()>>,
    drain: Option<JoinHandle<Vec<u8>>>,
}

impl CaptureHandle {
    pub fn new(kind: CaptureKind) -> Self {
        Self {
            kind,
            state: CaptureState::Inactive,
            stop_tx: None,
            drain: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Acquire the device and start buffering its chunk stream
    pub async fn start(&mut self, device: &dyn CaptureDevice) -> Result<(), CaptureError> {
        if self.state != CaptureState::Inactive {
            warn!("Capture already started ({:?})", self.kind);
            return Ok(());
        }

        let stream = device.open(self.kind).await?;
        let mut chunks = stream.chunks;
        self.stop_tx = Some(stream.stop);

        self.drain = Some(tokio::spawn(async move {
            let mut buffer = Vec::new();
            while let Some(chunk) = chunks.recv().await {
                buffer.extend_from_slice(&chunk);
            }
            buffer
        }));

        self.state = CaptureState::Recording;
        info!("Capture started ({:?})", self.kind);
        Ok(())
    }

    /// Stop the capture and return the finalized artifact
    ///
    /// Only the first call on a recording handle is honored; it signals
    /// the device, waits for end-of-stream and returns the artifact.
    pub async fn stop(&mut self) -> Option<RecordingArtifact> {
        if self.state != CaptureState::Recording {
            return None;
        }
        self.state = CaptureState::Stopped;

        if let Some(stop) = self.stop_tx.take() {
            // Device may already be gone; the drain task ends either way
            let _ = stop.send(());
        }

        let data = match self.drain.take() {
            Some(task) => match task.await {
                Ok(buffer) => buffer,
                Err(e) => {
                    error!("Capture drain task failed: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let artifact = RecordingArtifact {
            kind: self.kind,
            file_name: format!("{}-{}.webm", self.kind.file_prefix(), uuid::Uuid::new_v4()),
            data,
        };

        info!(
            "Capture stopped ({:?}): {} bytes",
            self.kind,
            artifact.data.len()
        );
        Some(artifact)
    }
}
