// Powerkey Core Library
// Power button watcher: device reading, event matching and shutdown dispatch

pub mod config;
pub mod input;
pub mod shutdown;
pub mod watcher;

pub use config::WatcherConfig;
pub use input::{EventReader, InputEvent, KeyState, Trigger, EV_KEY, KEY_POWER, RECORD_SIZE};
pub use shutdown::{CommandInvoker, ShutdownInvoker};
pub use watcher::{watch, Step, Watcher, WatcherError, WatcherResult, WatcherState};
