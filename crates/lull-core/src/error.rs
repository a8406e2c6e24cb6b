use futures::task::SpawnError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Re-renders kept marking components dirty.
    #[error("components were still dirty after {passes} render passes")]
    RenderLoop { passes: usize },
    #[error("failed to spawn local task: {0}")]
    Spawn(#[from] SpawnError),
}

/// Why a debounced call resolved without the callback's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TriggerError {
    #[error("debounced call was superseded by a later call")]
    Superseded,
    #[error("debounced call was cancelled")]
    Cancelled,
}
