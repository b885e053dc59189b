//! Where detached removal work runs
use futures::future::BoxFuture;
use std::fmt;

/// A task the spawner could not schedule, handed back to the caller.
pub struct Rejected(pub BoxFuture<'static, ()>);

impl fmt::Debug for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rejected(<task>)")
    }
}

/// Runs a fire-and-forget task to completion, or returns it when it can't.
pub trait Spawn: Send + Sync {
    fn spawn(&self, task: BoxFuture<'static, ()>) -> Result<(), Rejected>;
}

/// Spawns onto the ambient tokio runtime. Outside one the task is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl Spawn for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) -> Result<(), Rejected> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(task);
                Ok(())
            }
            Err(_) => Err(Rejected(task)),
        }
    }
}
