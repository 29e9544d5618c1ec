// Tests for the capture handle lifecycle
//
// A capture goes inactive -> recording -> stopped exactly once; the first
// stop materializes the buffered chunks into an artifact and every later
// stop is a no-op.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use interview_orchestrator::{
    CaptureDevice, CaptureError, CaptureHandle, CaptureKind, CaptureState, DeviceStream,
    SyntheticDevice,
};
use tokio::sync::{mpsc, oneshot};

/// Device yielding a fixed chunk sequence, flushing one final chunk on stop
struct ScriptedDevice {
    live_chunks: Vec<Vec<u8>>,
    final_chunk: Vec<u8>,
    stops: Arc<AtomicUsize>,
}

impl ScriptedDevice {
    fn new(live_chunks: Vec<Vec<u8>>, final_chunk: Vec<u8>) -> Self {
        Self {
            live_chunks,
            final_chunk,
            stops: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl CaptureDevice for ScriptedDevice {
    async fn open(&self, _kind: CaptureKind) -> Result<DeviceStream, CaptureError> {
        let (tx, rx) = mpsc::channel(8);
        let (stop_tx, stop_rx) = oneshot::channel();
        let live = self.live_chunks.clone();
        let last = self.final_chunk.clone();
        let stops = Arc::clone(&self.stops);

        tokio::spawn(async move {
            for chunk in live {
                if tx.send(chunk).await.is_err() {
                    return;
                }
            }
            let _ = stop_rx.await;
            stops.fetch_add(1, Ordering::SeqCst);
            let _ = tx.send(last).await;
        });

        Ok(DeviceStream {
            chunks: rx,
            stop: stop_tx,
        })
    }
}

struct DeniedDevice;

#[async_trait]
impl CaptureDevice for DeniedDevice {
    async fn open(&self, _kind: CaptureKind) -> Result<DeviceStream, CaptureError> {
        Err(CaptureError::PermissionDenied)
    }
}

#[tokio::test]
async fn stop_materializes_buffered_chunks_into_an_artifact() {
    let device = ScriptedDevice::new(vec![b"one-".to_vec(), b"two-".to_vec()], b"end".to_vec());
    let mut handle = CaptureHandle::new(CaptureKind::AudioVideo);

    assert_eq!(handle.state(), CaptureState::Inactive);
    handle.start(&device).await.unwrap();
    assert_eq!(handle.state(), CaptureState::Recording);

    let artifact = handle.stop().await.expect("first stop yields the artifact");
    assert_eq!(handle.state(), CaptureState::Stopped);
    assert_eq!(artifact.data, b"one-two-end".to_vec());
    assert_eq!(artifact.media_type(), "video/webm");
    assert!(artifact.file_name.starts_with("interview-"));
    assert!(artifact.file_name.ends_with(".webm"));
    assert_eq!(device.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn repeated_stops_are_no_ops() {
    let device = ScriptedDevice::new(vec![b"data".to_vec()], Vec::new());
    let mut handle = CaptureHandle::new(CaptureKind::AudioOnly);

    handle.start(&device).await.unwrap();
    assert!(handle.stop().await.is_some());
    assert!(handle.stop().await.is_none());
    assert!(handle.stop().await.is_none());
    assert_eq!(device.stops.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stop_before_start_yields_nothing() {
    let mut handle = CaptureHandle::new(CaptureKind::AudioVideo);
    assert!(handle.stop().await.is_none());
    assert_eq!(handle.state(), CaptureState::Inactive);
}

#[tokio::test]
async fn denied_device_leaves_handle_inactive() {
    let mut handle = CaptureHandle::new(CaptureKind::AudioOnly);
    let result = handle.start(&DeniedDevice).await;

    assert!(matches!(result, Err(CaptureError::PermissionDenied)));
    assert_eq!(handle.state(), CaptureState::Inactive);
    assert!(handle.stop().await.is_none());
}

#[tokio::test]
async fn second_start_on_a_recording_handle_is_ignored() {
    let device = ScriptedDevice::new(vec![b"a".to_vec()], b"b".to_vec());
    let mut handle = CaptureHandle::new(CaptureKind::AudioVideo);

    handle.start(&device).await.unwrap();
    // Ignored; the original stream keeps recording
    handle.start(&device).await.unwrap();
    assert_eq!(handle.state(), CaptureState::Recording);

    let artifact = handle.stop().await.unwrap();
    assert_eq!(artifact.data, b"ab".to_vec());
}

#[tokio::test(start_paused = true)]
async fn synthetic_device_streams_until_stopped() {
    let device = SyntheticDevice::new(Duration::from_millis(10));
    let mut handle = CaptureHandle::new(CaptureKind::AudioOnly);

    handle.start(&device).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let artifact = handle.stop().await.expect("synthetic capture yields data");
    assert!(!artifact.data.is_empty());
    assert!(artifact.file_name.starts_with("answer-"));
    assert_eq!(artifact.media_type(), "audio/webm");
}
