use tokio::time::Duration;

/// Fixed-delay pacing shared by the training and monitor loops. Both loops
/// sleep after a step's work completes, so two consecutive captures are
/// always separated by at least the configured delay.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn from_millis(ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(ms),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn wait(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn wait_sleeps_for_the_configured_delay() {
        let pacer = Pacer::from_millis(200);
        let before = Instant::now();
        pacer.wait().await;
        assert_eq!(before.elapsed(), Duration::from_millis(200));
    }
}
