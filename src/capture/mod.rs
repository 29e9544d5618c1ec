//! Recording capture lifecycle
//!
//! Two captures exist during an interview: one combined audio/video
//! recording spanning the whole session, and short-lived audio-only
//! recordings used to transcribe spoken answers. Both are modeled as a
//! `CaptureHandle` over a `CaptureDevice` stream, with an idempotent stop
//! so teardown paths can always release the device.

mod device;
mod handle;

pub use device::{CaptureDevice, CaptureError, CaptureKind, DeviceStream, SyntheticDevice};
pub use handle::{CaptureHandle, CaptureState, RecordingArtifact};
