pub mod gate;
pub mod notifier;

pub use gate::{AlertGate, AlertState};
pub use notifier::{CooldownNotifier, LogNotifier, Notifier};

/// Audio cue seam: fire-and-forget playback with an asynchronous completion
/// signal. Implementations must invoke `on_finished` exactly once when the
/// cue stops being audible (or immediately, if playback cannot start) —
/// the alert gate re-arms on that signal, not on a timer.
pub trait AlertSound: Send + Sync {
    fn play(&self, on_finished: Box<dyn FnOnce() + Send + 'static>);
}
