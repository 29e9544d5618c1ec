use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Which underlying streams a capture uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureKind {
    /// Combined camera + microphone, spans the whole session
    AudioVideo,
    /// Microphone only, used per spoken answer
    AudioOnly,
}

impl CaptureKind {
    pub fn media_type(&self) -> &'static str {
        match self {
            CaptureKind::AudioVideo => "video/webm",
            CaptureKind::AudioOnly => "audio/webm",
        }
    }

    pub(crate) fn file_prefix(&self) -> &'static str {
        match self {
            CaptureKind::AudioVideo => "interview",
            CaptureKind::AudioOnly => "answer",
        }
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture device unavailable: {0}")]
    Unavailable(String),

    #[error("capture permission denied")]
    PermissionDenied,
}

/// An open device stream
///
/// The device delivers binary chunks on `chunks` until `stop` is fired;
/// it then flushes whatever it still holds and closes the channel, which
/// is the end-of-stream signal.
pub struct DeviceStream {
    pub chunks: mpsc::Receiver<Vec<u8>>,
    pub stop: oneshot::Sender<()>,
}

/// Host-environment boundary for acquiring recording devices
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    async fn open(&self, kind: CaptureKind) -> Result<DeviceStream, CaptureError>;
}

/// In-process device emitting placeholder chunks on a fixed interval
///
/// Stands in for a real media pipeline in the CLI and in tests.
pub struct SyntheticDevice {
    chunk_interval: Duration,
}

impl SyntheticDevice {
    pub fn new(chunk_interval: Duration) -> Self {
        Self { chunk_interval }
    }
}

impl Default for SyntheticDevice {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl CaptureDevice for SyntheticDevice {
    async fn open(&self, kind: CaptureKind) -> Result<DeviceStream, CaptureError> {
        let (tx, rx) = mpsc::channel(64);
        let (stop_tx, mut stop_rx) = oneshot::channel();
        let period = self.chunk_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            let mut sequence = 0u64;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let chunk = format!("{} chunk {}\n", kind.media_type(), sequence).into_bytes();
                        sequence += 1;
                        if tx.send(chunk).await.is_err() {
                            break;
                        }
                    }
                }
            }
            // tx drops here, closing the chunk channel
        });

        Ok(DeviceStream {
            chunks: rx,
            stop: stop_tx,
        })
    }
}
