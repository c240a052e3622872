// Powerkey Configuration
// Fixed runtime parameters of the watcher

use std::path::PathBuf;
use std::time::Duration;

use crate::input::Trigger;

/// First event device node exposed by the input subsystem.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/input/event0";

/// Power-off utility run when the trigger fires.
pub const DEFAULT_SHUTDOWN_COMMAND: &str = "/sbin/poweroff";

/// Pause after a read failure other than an interrupt.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Watcher parameters.
///
/// The binary never reads these from a file or the environment; it
/// always runs with `WatcherConfig::default()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherConfig {
    pub device_path: PathBuf,
    pub shutdown_command: PathBuf,
    pub trigger: Trigger,
    pub retry_backoff: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            device_path: PathBuf::from(DEFAULT_DEVICE_PATH),
            shutdown_command: PathBuf::from(DEFAULT_SHUTDOWN_COMMAND),
            trigger: Trigger::POWER_PRESS,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl WatcherConfig {
    /// Same as the default, with a different backoff. Tests use zero.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}
