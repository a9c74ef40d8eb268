use thiserror::Error;

use crate::supervisor::Mode;

/// Frame acquisition failures. `DeviceUnavailable` is fatal to startup and
/// surfaced by the readiness handshake; `Failed` is a per-frame error.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("frame capture failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not decode frame: {0}")]
    Decode(String),
    #[error("feature extraction failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no training examples stored yet")]
    EmptyStore,
    #[error("embedding dimension mismatch: store holds {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("classification failed: {0}")]
    Classification(String),
}

/// Anything that can abort a training run. Training propagates the first
/// failure and stops; already-stored examples stay in the store.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A single monitor cycle going wrong. The loop logs these and moves on to
/// the next cycle rather than dying.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("cycle exceeded the {0} ms watchdog")]
    Timeout(u64),
}

/// Supervisor-boundary errors, the ones callers actually see.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error(transparent)]
    Device(#[from] CaptureError),
    #[error("no training examples yet; train at least one label before monitoring")]
    NotReady,
    #[error("cannot start {requested} while {active} is active")]
    Busy { active: Mode, requested: Mode },
    #[error("monitoring is not running")]
    NotMonitoring,
    #[error(transparent)]
    Training(#[from] TrainError),
    #[error("monitor task failed: {0}")]
    Monitor(String),
}
