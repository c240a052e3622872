// Powerkey Event Watcher
// Blocking read-filter-dispatch loop over one event device

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::WatcherConfig;
use crate::input::{EventReader, InputEvent, Trigger};
use crate::shutdown::{CommandInvoker, ShutdownInvoker};

/// Result type for watcher operations
pub type WatcherResult<T> = Result<T, WatcherError>;

/// Errors that stop the watcher before its loop starts
#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    #[error("Could not open event device {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the watcher is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    /// Blocked in (or about to enter) the device read
    AwaitingEvent,
    /// Running the shutdown invoker for a matched event
    Dispatching,
}

/// Outcome of a single read attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A record was read and it did not match the trigger
    Ignored(InputEvent),
    /// A record matched and the shutdown invoker was called
    Dispatched(InputEvent),
    /// The read was interrupted by a signal
    Interrupted,
    /// The read failed for another reason; it will be retried
    ReadFailed(io::ErrorKind),
}

/// Watches one event device and starts a shutdown on every trigger match.
///
/// There is no de-duplication: each matching record calls the invoker
/// again, and the watcher keeps reading after every dispatch.
pub struct Watcher<R, S> {
    reader: EventReader<R>,
    invoker: S,
    trigger: Trigger,
    retry_backoff: Duration,
    state: WatcherState,
    dispatch_count: u64,
    /// Set while consecutive reads keep failing
    failing: bool,
}

impl<R: Read, S: ShutdownInvoker> Watcher<R, S> {
    pub fn new(reader: EventReader<R>, invoker: S, config: &WatcherConfig) -> Self {
        Self {
            reader,
            invoker,
            trigger: config.trigger,
            retry_backoff: config.retry_backoff,
            state: WatcherState::AwaitingEvent,
            dispatch_count: 0,
            failing: false,
        }
    }

    /// Perform one blocking read and act on its result.
    pub fn step(&mut self) -> Step {
        self.state = WatcherState::AwaitingEvent;

        match self.reader.read_event() {
            Ok(event) => {
                if self.failing {
                    log::warn!("Event device is readable again");
                    self.failing = false;
                }
                log::debug!(
                    "Event: type={} code={} value={:?}",
                    event.event_type,
                    event.code,
                    event.key_state()
                );

                if self.trigger.matches(&event) {
                    self.dispatch();
                    Step::Dispatched(event)
                } else {
                    Step::Ignored(event)
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                log::trace!("Read interrupted, retrying");
                Step::Interrupted
            }
            Err(e) => {
                // Retried forever, even when the device is gone for good.
                if self.failing {
                    log::debug!("Read from event device failed again: {}", e);
                } else {
                    log::warn!("Read from event device failed, retrying: {}", e);
                    self.failing = true;
                }
                if !self.retry_backoff.is_zero() {
                    std::thread::sleep(self.retry_backoff);
                }
                Step::ReadFailed(e.kind())
            }
        }
    }

    fn dispatch(&mut self) {
        self.state = WatcherState::Dispatching;
        log::debug!("State: {:?}", self.state);
        self.dispatch_count += 1;

        log::info!("Power button pressed, starting shutdown");
        if let Err(e) = self.invoker.invoke() {
            log::error!("Could not start shutdown command: {}", e);
        }

        self.state = WatcherState::AwaitingEvent;
        log::debug!("State: {:?}", self.state);
    }

    /// Read and dispatch until `running` is cleared.
    ///
    /// The flag is checked between reads only; a read that is already
    /// blocked keeps blocking until a record arrives or it is interrupted.
    pub fn run(&mut self, running: &AtomicBool) {
        while running.load(Ordering::SeqCst) {
            self.step();
        }
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Number of times the invoker has been called, successful or not.
    pub fn dispatch_count(&self) -> u64 {
        self.dispatch_count
    }

    pub fn invoker(&self) -> &S {
        &self.invoker
    }

    pub fn reader(&self) -> &EventReader<R> {
        &self.reader
    }
}

/// Open the configured device and watch it for good.
///
/// Only returns on the fatal open failure.
pub fn watch(config: &WatcherConfig) -> WatcherResult<()> {
    let reader = EventReader::open(&config.device_path)?;
    let invoker = CommandInvoker::new(config.shutdown_command.clone());
    let mut watcher = Watcher::new(reader, invoker, config);

    log::info!(
        "Watching {} for power button presses",
        config.device_path.display()
    );

    // Never cleared: the process ends by signal or by the shutdown itself.
    let running = AtomicBool::new(true);
    watcher.run(&running);
    Ok(())
}
