use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::GuardError;

use super::loop_worker::{monitor_loop, MonitorDeps};

const ENABLE_LOGS: bool = true;
use crate::log_info;

/// Owns the monitor task: spawn under a cancellation token, cancel and join
/// on stop. At most one loop task exists at a time.
pub struct MonitorController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl MonitorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self, deps: MonitorDeps) -> Result<(), GuardError> {
        if self.handle.is_some() {
            return Err(GuardError::Monitor("monitor already active".into()));
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(monitor_loop(deps, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        log_info!("monitor task spawned");
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), GuardError> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .map_err(|err| GuardError::Monitor(format!("monitor task failed to join: {err}")))
        } else {
            Ok(())
        }
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new()
    }
}
