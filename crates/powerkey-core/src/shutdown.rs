// Powerkey Shutdown Dispatch
// Fire-and-forget invocation of the system power-off command

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Capability to start a system shutdown.
///
/// The watcher calls `invoke` once per matching event and ignores
/// whatever the shutdown does afterwards.
pub trait ShutdownInvoker {
    fn invoke(&mut self) -> io::Result<()>;
}

impl<F> ShutdownInvoker for F
where
    F: FnMut() -> io::Result<()>,
{
    fn invoke(&mut self) -> io::Result<()> {
        self()
    }
}

/// Runs an external command with no arguments and does not wait for it.
#[derive(Debug, Clone)]
pub struct CommandInvoker {
    program: PathBuf,
}

impl CommandInvoker {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl ShutdownInvoker for CommandInvoker {
    /// Spawn the command. Its output goes wherever ours does and its
    /// exit status is never collected.
    fn invoke(&mut self) -> io::Result<()> {
        let child = Command::new(&self.program)
            .stdin(Stdio::null())
            .spawn()?;
        log::info!("Started {} (pid {})", self.program.display(), child.id());
        Ok(())
    }
}
