use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::alert::AlertGate;
use crate::capture::{FeatureExtractor, FrameSource};
use crate::classifier::ExampleStore;
use crate::error::CycleError;
use crate::utils::pacing::Pacer;

use super::decision::is_touched;
use super::stats::MonitorStats;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

/// Everything one monitor task needs, passed in as explicit handles rather
/// than reached for globally.
pub struct MonitorDeps {
    pub source: Arc<dyn FrameSource>,
    pub extractor: Arc<dyn FeatureExtractor>,
    pub store: Arc<dyn ExampleStore>,
    pub gate: Arc<AlertGate>,
    pub stats: Arc<MonitorStats>,
    pub touched_tx: watch::Sender<bool>,
    pub threshold: f32,
    pub pacer: Pacer,
    pub watchdog_ms: u64,
}

/// The inference loop: capture, embed, classify, decide, maybe alert, then
/// sleep the inter-cycle delay and go again until cancelled. A cycle that
/// errors or outlives the watchdog is logged, counted, and skipped; the
/// loop itself keeps running, because one bad frame must not end
/// monitoring.
pub async fn monitor_loop(deps: MonitorDeps, cancel_token: CancellationToken) {
    let watchdog = Duration::from_millis(deps.watchdog_ms);
    log_info!(
        "monitor loop started (cycle delay {} ms, threshold {})",
        deps.pacer.delay().as_millis(),
        deps.threshold
    );

    loop {
        tokio::select! {
            outcome = tokio::time::timeout(watchdog, perform_cycle(&deps)) => {
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        log_error!("monitor cycle failed, skipping: {err}");
                        deps.stats.record_skip();
                    }
                    Err(_) => {
                        let err = CycleError::Timeout(deps.watchdog_ms);
                        log_warn!("monitor cycle skipped: {err}");
                        deps.stats.record_skip();
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("monitor loop shutting down");
                break;
            }
        }

        tokio::select! {
            _ = deps.pacer.wait() => {}
            _ = cancel_token.cancelled() => {
                log_info!("monitor loop shutting down");
                break;
            }
        }
    }
}

async fn perform_cycle(deps: &MonitorDeps) -> Result<(), CycleError> {
    let frame = deps.source.current_frame().await?;
    let embedding = deps.extractor.embed(&frame).await?;
    let result = deps.store.predict(&embedding).await?;

    log_debug!(
        "cycle: label={} confidences=(not_touched {:.2}, touched {:.2})",
        result.label.as_str(),
        result.confidences.not_touched,
        result.confidences.touched
    );

    let touched = is_touched(&result, deps.threshold);
    if touched {
        if deps.gate.fire() {
            deps.stats.record_episode();
        }
    }
    // The touched flag is a pure projection of this cycle's result; a
    // not-touched cycle does NOT re-arm the gate (that happens only on cue
    // completion).
    let _ = deps.touched_tx.send(touched);
    deps.stats.record_cycle(touched);

    Ok(())
}
