mod controller;

pub use controller::{TrainingController, TrainingReport, DEFAULT_TRAINING_PASSES};
