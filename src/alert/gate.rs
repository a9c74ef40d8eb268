use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;

use super::notifier::CooldownNotifier;
use super::AlertSound;

const ENABLE_LOGS: bool = true;
use crate::log_info;

const NOTIFY_TITLE: &str = "Don't touch your face";
const NOTIFY_BODY: &str = "You just touched your face!!!";

/// Whether the gate may fire. `CoolingDown` lasts from a fired alert until
/// the audio cue's completion signal arrives; it is not timer-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertState {
    Armed,
    CoolingDown,
}

const ARMED: u8 = 0;
const COOLING_DOWN: u8 = 1;

// Shared with the audio completion closure, which arrives from the audio
// thread after the gate handle may have moved on.
struct GateCell {
    state: AtomicU8,
    episodes: AtomicU64,
}

impl GateCell {
    fn re_arm(&self) {
        self.state.store(ARMED, Ordering::SeqCst);
        log_info!("alert cue finished, gate re-armed");
    }
}

/// Rate limiter for the alert side effects. However many consecutive cycles
/// report a touch, each `Armed -> CoolingDown` transition plays the cue and
/// sends the notification exactly once; further `fire` calls are no-ops
/// until the cue-completion signal re-arms the gate. The notifier's own
/// cooldown window is a second, deliberately redundant layer underneath
/// this one, in case the completion signal is delayed or lost.
pub struct AlertGate {
    cell: Arc<GateCell>,
    sound: Arc<dyn AlertSound>,
    notifier: Arc<CooldownNotifier>,
}

impl AlertGate {
    pub fn new(sound: Arc<dyn AlertSound>, notifier: Arc<CooldownNotifier>) -> Self {
        Self {
            cell: Arc::new(GateCell {
                state: AtomicU8::new(ARMED),
                episodes: AtomicU64::new(0),
            }),
            sound,
            notifier,
        }
    }

    /// Request an alert. Returns true when this call started a new episode.
    /// The compare-exchange makes the exactly-once guarantee hold even when
    /// the completion callback races in from the audio thread.
    pub fn fire(&self) -> bool {
        if self
            .cell
            .state
            .compare_exchange(ARMED, COOLING_DOWN, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let episode = self.cell.episodes.fetch_add(1, Ordering::SeqCst) + 1;
        log_info!("alert episode {episode} started");

        let cell = Arc::clone(&self.cell);
        self.sound.play(Box::new(move || cell.re_arm()));
        self.notifier.notify(NOTIFY_TITLE, NOTIFY_BODY);
        true
    }

    /// Completion signal from the audio backend: the episode is over and the
    /// gate may fire again. Exposed for hosts that wire their own audio
    /// stack instead of the callback-carrying [`AlertSound`] seam.
    pub fn cue_finished(&self) {
        self.cell.re_arm();
    }

    pub fn state(&self) -> AlertState {
        match self.cell.state.load(Ordering::SeqCst) {
            ARMED => AlertState::Armed,
            _ => AlertState::CoolingDown,
        }
    }

    /// Episodes started since construction.
    pub fn episode_count(&self) -> u64 {
        self.cell.episodes.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::notifier::Notifier;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSound {
        plays: AtomicUsize,
        finishers: Mutex<Vec<Box<dyn FnOnce() + Send>>>,
    }

    impl AlertSound for RecordingSound {
        fn play(&self, on_finished: Box<dyn FnOnce() + Send + 'static>) {
            self.plays.fetch_add(1, Ordering::SeqCst);
            self.finishers.lock().unwrap().push(on_finished);
        }
    }

    impl RecordingSound {
        fn finish_cue(&self) {
            let finisher = self.finishers.lock().unwrap().pop().unwrap();
            finisher();
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        sent: AtomicUsize,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _title: &str, _body: &str) {
            self.sent.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn gate_with_mocks() -> (AlertGate, Arc<RecordingSound>, Arc<RecordingNotifier>) {
        let sound = Arc::new(RecordingSound::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let cooldown = Arc::new(CooldownNotifier::new(
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            3000,
        ));
        let gate = AlertGate::new(Arc::clone(&sound) as Arc<dyn AlertSound>, cooldown);
        (gate, sound, notifier)
    }

    #[tokio::test]
    async fn repeated_fires_produce_one_side_effect_set() {
        let (gate, sound, notifier) = gate_with_mocks();

        assert!(gate.fire());
        for _ in 0..10 {
            assert!(!gate.fire());
        }

        assert_eq!(sound.plays.load(Ordering::SeqCst), 1);
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);
        assert_eq!(gate.state(), AlertState::CoolingDown);
        assert_eq!(gate.episode_count(), 1);
    }

    #[tokio::test]
    async fn cue_completion_re_arms_the_gate() {
        let (gate, sound, _notifier) = gate_with_mocks();

        assert!(gate.fire());
        assert!(!gate.fire());

        sound.finish_cue();
        assert_eq!(gate.state(), AlertState::Armed);

        assert!(gate.fire());
        assert_eq!(sound.plays.load(Ordering::SeqCst), 2);
        assert_eq!(gate.episode_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn notification_cooldown_is_an_independent_layer() {
        let (gate, sound, notifier) = gate_with_mocks();

        assert!(gate.fire());
        sound.finish_cue();

        // The gate re-armed, but the notifier's own window has not elapsed:
        // the second episode plays the cue without a second notification.
        assert!(gate.fire());
        assert_eq!(sound.plays.load(Ordering::SeqCst), 2);
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 1);

        sound.finish_cue();
        tokio::time::advance(std::time::Duration::from_millis(3001)).await;

        assert!(gate.fire());
        assert_eq!(notifier.sent.load(Ordering::SeqCst), 2);
    }
}
