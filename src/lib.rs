pub mod alert;
pub mod audio;
pub mod capture;
pub mod classifier;
pub mod error;
pub mod monitor;
pub mod settings;
pub mod supervisor;
pub mod training;
pub mod utils;

pub use alert::{AlertGate, AlertSound, AlertState, CooldownNotifier, LogNotifier, Notifier};
pub use audio::CuePlayer;
pub use capture::{
    FeatureExtractor, Frame, FrameSource, PixelEmbedder, Scene, SyntheticCamera,
};
pub use classifier::{
    Classification, Confidences, Embedding, ExampleStore, KnnStore, Label, LabelCounts,
};
pub use error::{CaptureError, CycleError, ExtractionError, GuardError, StoreError, TrainError};
pub use monitor::{MonitorStats, StatsSnapshot};
pub use settings::{GuardSettings, SettingsStore};
pub use supervisor::{Mode, Supervisor};
pub use training::{TrainingController, TrainingReport, DEFAULT_TRAINING_PASSES};
