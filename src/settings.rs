use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::classifier::knn::DEFAULT_K;
use crate::monitor::decision::TOUCHED_CONFIDENCE;
use crate::training::DEFAULT_TRAINING_PASSES;

/// Tunables for the training and monitoring loops. Defaults match the
/// behavior the system was demonstrated with: 50 training passes, 100 ms
/// between training steps, 200 ms between monitor cycles, a 0.8 touched
/// threshold, and a 3 s notification cooldown.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardSettings {
    pub training_passes: usize,
    pub train_step_delay_ms: u64,
    pub cycle_delay_ms: u64,
    pub touched_confidence: f32,
    pub notify_cooldown_ms: u64,
    pub cycle_watchdog_ms: u64,
    pub knn_k: usize,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            training_passes: DEFAULT_TRAINING_PASSES,
            train_step_delay_ms: 100,
            cycle_delay_ms: 200,
            touched_confidence: TOUCHED_CONFIDENCE,
            notify_cooldown_ms: 3000,
            cycle_watchdog_ms: 2000,
            knn_k: DEFAULT_K,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UserSettings {
    guard: GuardSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn guard(&self) -> GuardSettings {
        self.data.read().unwrap().guard.clone()
    }

    pub fn update_guard(&self, settings: GuardSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    /// Re-read the file, picking up edits made outside this store.
    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)?;
        let data: UserSettings = serde_json::from_str(&contents)?;
        let mut guard = self.data.write().unwrap();
        *guard = data;
        Ok(())
    }
}
