use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::alert::{AlertGate, AlertSound, AlertState, CooldownNotifier, Notifier};
use crate::capture::{FeatureExtractor, FrameSource};
use crate::classifier::{ExampleStore, Label, LabelCounts};
use crate::error::GuardError;
use crate::monitor::{MonitorController, MonitorDeps, MonitorStats, StatsSnapshot};
use crate::settings::GuardSettings;
use crate::training::{TrainingController, TrainingReport};
use crate::utils::pacing::Pacer;

const ENABLE_LOGS: bool = true;
use crate::log_info;

/// What the supervisor is currently doing. Training and monitoring are
/// mutually exclusive because both contend for the frame source and the
/// example store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Training,
    Monitoring,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Idle => "idle",
            Mode::Training => "training",
            Mode::Monitoring => "monitoring",
        };
        f.write_str(name)
    }
}

/// The caller boundary. Owns the collaborator handles for the lifetime of
/// the process, enforces the training/monitoring mutual exclusion, and
/// publishes the touched flag.
pub struct Supervisor {
    source: Arc<dyn FrameSource>,
    extractor: Arc<dyn FeatureExtractor>,
    store: Arc<dyn ExampleStore>,
    gate: Arc<AlertGate>,
    stats: Arc<MonitorStats>,
    settings: GuardSettings,
    mode: Mutex<Mode>,
    monitor: tokio::sync::Mutex<MonitorController>,
    touched_tx: watch::Sender<bool>,
    touched_rx: watch::Receiver<bool>,
}

impl Supervisor {
    pub fn new(
        source: Arc<dyn FrameSource>,
        extractor: Arc<dyn FeatureExtractor>,
        store: Arc<dyn ExampleStore>,
        sound: Arc<dyn AlertSound>,
        notifier: Arc<dyn Notifier>,
        settings: GuardSettings,
    ) -> Self {
        let cooldown = Arc::new(CooldownNotifier::new(notifier, settings.notify_cooldown_ms));
        let gate = Arc::new(AlertGate::new(sound, cooldown));
        let (touched_tx, touched_rx) = watch::channel(false);

        Self {
            source,
            extractor,
            store,
            gate,
            stats: Arc::new(MonitorStats::new()),
            settings,
            mode: Mutex::new(Mode::Idle),
            monitor: tokio::sync::Mutex::new(MonitorController::new()),
            touched_tx,
            touched_rx,
        }
    }

    /// Device handshake: acquire the camera and wait for the first frame.
    /// Must succeed before training or monitoring is requested; failure is
    /// fatal to startup and there is no retry here.
    pub async fn init(&self) -> Result<(), GuardError> {
        self.source.ensure_ready().await?;
        log_info!("frame source ready");
        Ok(())
    }

    /// Collect the configured number of examples for `label`.
    pub async fn request_training(&self, label: Label) -> Result<TrainingReport, GuardError> {
        self.request_training_passes(label, self.settings.training_passes)
            .await
    }

    pub async fn request_training_passes(
        &self,
        label: Label,
        passes: usize,
    ) -> Result<TrainingReport, GuardError> {
        // Held across the await: if the caller drops this future mid-run
        // (timeout, select), the guard still returns the mode to Idle.
        let _guard = self.enter(Mode::Training)?;

        let trainer = TrainingController::new(
            Arc::clone(&self.source),
            Arc::clone(&self.extractor),
            Arc::clone(&self.store),
            Pacer::from_millis(self.settings.train_step_delay_ms),
        );
        let report = trainer.train(label, passes).await?;
        Ok(report)
    }

    /// Start the monitor loop. Refused while training or monitoring is
    /// already active, and refused as not-ready while the store holds zero
    /// examples (the empty-store failure surfaces here, before the loop
    /// would hit it every cycle).
    pub async fn start_monitoring(&self) -> Result<(), GuardError> {
        let guard = self.enter(Mode::Monitoring)?;

        if self.store.label_counts().await.total() == 0 {
            return Err(GuardError::NotReady);
        }

        let deps = MonitorDeps {
            source: Arc::clone(&self.source),
            extractor: Arc::clone(&self.extractor),
            store: Arc::clone(&self.store),
            gate: Arc::clone(&self.gate),
            stats: Arc::clone(&self.stats),
            touched_tx: self.touched_tx.clone(),
            threshold: self.settings.touched_confidence,
            pacer: Pacer::from_millis(self.settings.cycle_delay_ms),
            watchdog_ms: self.settings.cycle_watchdog_ms,
        };

        let mut monitor = self.monitor.lock().await;
        monitor.start(deps)?;
        // The loop task is running now; Monitoring persists past this call
        // and ends in stop_monitoring.
        guard.persist();
        Ok(())
    }

    pub async fn stop_monitoring(&self) -> Result<(), GuardError> {
        {
            let mode = self.mode.lock().unwrap();
            if *mode != Mode::Monitoring {
                return Err(GuardError::NotMonitoring);
            }
        }

        let mut monitor = self.monitor.lock().await;
        let result = monitor.stop().await;
        self.exit();
        result
    }

    /// The touched flag as of the most recent completed monitor cycle.
    pub fn touched(&self) -> bool {
        *self.touched_rx.borrow()
    }

    /// Watch-channel subscription for callers that want to react to flag
    /// changes instead of polling.
    pub fn subscribe_touched(&self) -> watch::Receiver<bool> {
        self.touched_rx.clone()
    }

    pub fn mode(&self) -> Mode {
        *self.mode.lock().unwrap()
    }

    pub fn alert_state(&self) -> AlertState {
        self.gate.state()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn label_counts(&self) -> LabelCounts {
        self.store.label_counts().await
    }

    fn enter(&self, requested: Mode) -> Result<ModeGuard<'_>, GuardError> {
        let mut mode = self.mode.lock().unwrap();
        if *mode != Mode::Idle {
            return Err(GuardError::Busy {
                active: *mode,
                requested,
            });
        }
        *mode = requested;
        log_info!("mode: {requested}");
        Ok(ModeGuard {
            mode: &self.mode,
            armed: true,
        })
    }

    fn exit(&self) {
        let mut mode = self.mode.lock().unwrap();
        *mode = Mode::Idle;
    }
}

/// Returns the supervisor to Idle when dropped, including when the future
/// holding it is dropped mid-await. `persist` disarms it for the one case
/// where the entered mode outlives the call (a successfully spawned monitor
/// task).
struct ModeGuard<'a> {
    mode: &'a Mutex<Mode>,
    armed: bool,
}

impl ModeGuard<'_> {
    fn persist(mut self) {
        self.armed = false;
    }
}

impl Drop for ModeGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Skip on poison rather than panic inside drop.
        if let Ok(mut mode) = self.mode.lock() {
            *mode = Mode::Idle;
        }
    }
}
