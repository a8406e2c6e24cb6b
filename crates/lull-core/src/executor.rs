use std::cell::RefCell;
use std::future::Future;

use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;

use crate::error::RuntimeError;

thread_local! {
    static POOL: RefCell<LocalPool> = RefCell::new(LocalPool::new());
    static SPAWNER: LocalSpawner = POOL.with(|p| p.borrow().spawner());
}

/// Spawn a future on this thread's local pool. It makes progress whenever the
/// runtime ticks.
pub fn spawn_local(fut: impl Future<Output = ()> + 'static) -> Result<(), RuntimeError> {
    SPAWNER.with(|s| s.spawn_local(fut))?;
    Ok(())
}

/// Poll spawned tasks until none can make progress. Returns the number of
/// tasks that completed. Calls made from inside a running task return 0.
pub fn run_until_stalled() -> usize {
    // The spawner reads the pool on first use; do that before the pool is
    // mutably borrowed below.
    SPAWNER.with(|_| ());
    POOL.with(|p| {
        let Ok(mut pool) = p.try_borrow_mut() else {
            return 0;
        };
        let mut completed = 0;
        while pool.try_run_one() {
            completed += 1;
        }
        completed
    })
}
