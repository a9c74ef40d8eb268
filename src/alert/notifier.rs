use std::sync::{Arc, Mutex};

use tokio::time::{Duration, Instant};

const ENABLE_LOGS: bool = true;
use crate::{log_debug, log_info};

/// Desktop-notification delivery seam. Fire-and-forget; delivery itself is
/// an external concern (a real backend wraps the platform's notification
/// API), so failures are the backend's to log, not to return.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Wraps a [`Notifier`] in a cooldown window configured once at startup:
/// within the window, repeat notifications are dropped. This is the coarser
/// of the two alert suppression layers and keeps working even if the audio
/// completion signal never re-arms the gate.
pub struct CooldownNotifier {
    inner: Arc<dyn Notifier>,
    window: Duration,
    last_sent: Mutex<Option<Instant>>,
}

impl CooldownNotifier {
    pub fn new(inner: Arc<dyn Notifier>, window_ms: u64) -> Self {
        Self {
            inner,
            window: Duration::from_millis(window_ms),
            last_sent: Mutex::new(None),
        }
    }

    pub fn notify(&self, title: &str, body: &str) {
        let mut last_sent = self.last_sent.lock().unwrap();
        let now = Instant::now();
        if let Some(previous) = *last_sent {
            if now.duration_since(previous) <= self.window {
                log_debug!("notification suppressed inside the cooldown window");
                return;
            }
        }
        *last_sent = Some(now);
        drop(last_sent);
        self.inner.notify(title, body);
    }
}

/// Log-backed notifier used by the demo binary and anywhere no desktop
/// channel is wired up.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        log_info!("notification: {title} - {body}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counter(AtomicUsize);

    impl Notifier for Counter {
        fn notify(&self, _title: &str, _body: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn notifications_inside_the_window_are_dropped() {
        let counter = Arc::new(Counter::default());
        let notifier = CooldownNotifier::new(Arc::clone(&counter) as Arc<dyn Notifier>, 3000);

        notifier.notify("t", "b");
        notifier.notify("t", "b");
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(1500)).await;
        notifier.notify("t", "b");
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(1501)).await;
        notifier.notify("t", "b");
        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
