pub mod embedder;
pub mod synthetic;

pub use embedder::{FeatureExtractor, PixelEmbedder};
pub use synthetic::{Scene, SyntheticCamera};

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CaptureError;

/// One captured frame: encoded image bytes plus the capture timestamp. The
/// bytes are shared rather than cloned because extraction hands them to a
/// blocking worker.
#[derive(Debug, Clone)]
pub struct Frame {
    pub png_bytes: Arc<Vec<u8>>,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(png_bytes: Vec<u8>) -> Self {
        Self {
            png_bytes: Arc::new(png_bytes),
            captured_at: Utc::now(),
        }
    }
}

/// Camera-facing seam. `ensure_ready` is the device handshake (acquire the
/// device, wait for the first frame) and is a precondition checked before
/// either loop starts, not part of the loops themselves.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn ensure_ready(&self) -> Result<(), CaptureError>;

    /// Snapshot of the latest available frame.
    async fn current_frame(&self) -> Result<Frame, CaptureError>;
}
