use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RespawnError, Result};

/// Restart-throttling parameters for the watchdog loop.
///
/// The defaults reproduce the classic policy: a worker that outlived the
/// 60-second window is restarted after 1 second, a worker that died inside
/// the window waits the full 60 seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Window after a restart during which the next death counts as a crash loop
    pub throttle_window_secs: u64,
    /// Delay before relaunch when the worker ran long enough (default: 1s)
    pub fast_restart_secs: u64,
    /// Delay before relaunch when the worker died inside the window (default: 60s)
    pub slow_restart_secs: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            throttle_window_secs: 60,
            fast_restart_secs: 1,
            slow_restart_secs: 60,
        }
    }
}

impl SupervisorConfig {
    /// Load from a TOML file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                let raw = fs::read_to_string(p).map_err(|e| {
                    RespawnError::Config(format!("{}: {}", p.display(), e))
                })?;
                toml::from_str(&raw)
                    .map_err(|e| RespawnError::Config(format!("{}: {}", p.display(), e)))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_secs(self.throttle_window_secs)
    }

    pub fn fast_restart(&self) -> Duration {
        Duration::from_secs(self.fast_restart_secs)
    }

    pub fn slow_restart(&self) -> Duration {
        Duration::from_secs(self.slow_restart_secs)
    }
}

/// Get the log directory
pub fn log_dir() -> PathBuf {
    std::env::var("RESPAWN_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/var/log/respawn"))
}
