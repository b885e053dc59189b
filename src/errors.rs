// /src/errors.rs
//! Errors surfaced by the view list. Hook failures pass through untouched.
use std::error::Error;
use std::sync::Arc;
use thiserror::Error;

/// Error type hooks return. Anything convertible into it works.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Shared form of a hook failure, so a failed handle can be awaited many times.
pub type HookError = Arc<dyn Error + Send + Sync>;

#[derive(Error, Debug, Clone)]
pub enum ViewListError {
    #[error("create hook failed at index {index}: {source}")]
    Create { index: usize, source: HookError },

    #[error("remove hook failed: {source}")]
    Remove { source: HookError },

    #[error("view list has been disposed")]
    Disposed,
}

impl ViewListError {
    pub(crate) fn create(index: usize, err: BoxError) -> Self {
        ViewListError::Create { index, source: Arc::from(err) }
    }

    pub(crate) fn remove(err: BoxError) -> Self {
        ViewListError::Remove { source: Arc::from(err) }
    }

    /// The hook's own error, if this came from a hook.
    pub fn hook_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            ViewListError::Create { source, .. } | ViewListError::Remove { source } => {
                Some(source.as_ref())
            }
            ViewListError::Disposed => None,
        }
    }
}
