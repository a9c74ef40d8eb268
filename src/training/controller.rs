use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::capture::{FeatureExtractor, FrameSource};
use crate::classifier::{ExampleStore, Label, LabelCounts};
use crate::error::TrainError;
use crate::utils::pacing::Pacer;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub const DEFAULT_TRAINING_PASSES: usize = 50;

/// Summary of one training run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingReport {
    pub run_id: String,
    pub label: Label,
    pub requested_passes: usize,
    pub stored_passes: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub label_counts: LabelCounts,
}

/// Collects labeled examples: capture a frame, embed it, store the
/// (embedding, label) pair, wait the inter-step delay, repeat. Steps are
/// strictly sequential — the frame source and the growing store are shared,
/// and concurrent submission would make the label balance unpredictable.
pub struct TrainingController {
    source: Arc<dyn FrameSource>,
    extractor: Arc<dyn FeatureExtractor>,
    store: Arc<dyn ExampleStore>,
    pacer: Pacer,
}

impl TrainingController {
    pub fn new(
        source: Arc<dyn FrameSource>,
        extractor: Arc<dyn FeatureExtractor>,
        store: Arc<dyn ExampleStore>,
        pacer: Pacer,
    ) -> Self {
        Self {
            source,
            extractor,
            store,
            pacer,
        }
    }

    /// Run `passes` training steps for `label`. The first failing step
    /// aborts the run and propagates; examples stored before the failure
    /// stay in the store (append-only), so re-running is safe. Repeat runs
    /// for the same label are additive and deliberately bias future
    /// predictions toward that label.
    pub async fn train(&self, label: Label, passes: usize) -> Result<TrainingReport, TrainError> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        log_info!(
            "[{}] training run {run_id}: {passes} passes",
            label.as_str()
        );

        let mut stored = 0usize;
        for pass in 0..passes {
            if let Err(err) = self.training_step(label).await {
                log_error!(
                    "[{}] training run {run_id} aborted at pass {}/{passes}: {err}",
                    label.as_str(),
                    pass + 1
                );
                return Err(err);
            }
            stored += 1;
            log_info!(
                "Progress {}% training",
                ((pass + 1) * 100) / passes.max(1)
            );
        }

        let report = TrainingReport {
            run_id,
            label,
            requested_passes: passes,
            stored_passes: stored,
            started_at,
            finished_at: Utc::now(),
            label_counts: self.store.label_counts().await,
        };
        log_info!(
            "[{}] training run {} done: {} examples stored, store now {:?}",
            label.as_str(),
            report.run_id,
            report.stored_passes,
            report.label_counts
        );
        Ok(report)
    }

    async fn training_step(&self, label: Label) -> Result<(), TrainError> {
        let frame = self.source.current_frame().await?;
        let embedding = self.extractor.embed(&frame).await?;
        self.store.add_example(embedding, label).await?;
        self.pacer.wait().await;
        Ok(())
    }
}
