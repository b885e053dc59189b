//! Shared types: pending handles, hook signatures, options and key wrappers
use crate::errors::{BoxError, ViewListError};
use futures::future::{BoxFuture, Shared};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A view that may still be under construction. Cloning shares the same result.
pub type PendingView<V> = Shared<BoxFuture<'static, Result<V, ViewListError>>>;

/// Builds the view for `model` at `index`, possibly asynchronously.
pub type CreateHook<M, V, C> =
    Arc<dyn Fn(&C, &M, usize) -> BoxFuture<'static, Result<V, BoxError>> + Send + Sync>;

/// Tears down a resolved view.
pub type RemoveHook<V, C> = Arc<dyn Fn(&C, V) -> Result<(), BoxError> + Send + Sync>;

/// Views that know how to tear themselves down. Required for the default removal hook.
pub trait Removable {
    /// Detach the view from wherever it is rendered and release what it holds.
    /// Called once per view, after it resolved. An error is reported to whoever
    /// drove the removal: `remove()` or an awaited update returns it, a detached
    /// removal logs it.
    fn remove(self) -> Result<(), BoxError>;
}

/// Model key compared by pointer identity instead of value.
pub struct ByRef<T: ?Sized>(pub Arc<T>);

impl<T: ?Sized> ByRef<T> {
    pub fn new(inner: Arc<T>) -> Self {
        ByRef(inner)
    }

    pub fn get(&self) -> &T {
        &self.0
    }
}

impl<T> From<T> for ByRef<T> {
    fn from(value: T) -> Self {
        ByRef(Arc::new(value))
    }
}

impl<T: ?Sized> Clone for ByRef<T> {
    fn clone(&self) -> Self {
        ByRef(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for ByRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: ?Sized> Eq for ByRef<T> {}

impl<T: ?Sized + fmt::Debug> fmt::Debug for ByRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByRef({:?} @ {:p})", &*self.0, Arc::as_ptr(&self.0))
    }
}

/// When removals finish relative to the future `update` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Removals run on the spawner; `update` only waits for creations.
    #[default]
    Detached,
    /// `update` also waits for every removal hook and reports its failure.
    Awaited,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewListOptions {
    pub removal: RemovalPolicy,
    /// Shown in log lines instead of the generated id.
    pub label: Option<String>,
}

impl ViewListOptions {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Per-call replacements for the hooks and context captured at construction.
pub struct UpdateOverrides<M, V, C> {
    pub create: Option<CreateHook<M, V, C>>,
    pub remove: Option<RemoveHook<V, C>>,
    pub context: Option<Arc<C>>,
}

impl<M, V, C> Default for UpdateOverrides<M, V, C> {
    fn default() -> Self {
        UpdateOverrides { create: None, remove: None, context: None }
    }
}

impl<M, V, C> UpdateOverrides<M, V, C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(mut self, hook: CreateHook<M, V, C>) -> Self {
        self.create = Some(hook);
        self
    }

    pub fn remove(mut self, hook: RemoveHook<V, C>) -> Self {
        self.remove = Some(hook);
        self
    }

    pub fn context(mut self, context: impl Into<Arc<C>>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Global ID generator (lock-free, atomic)
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub(crate) fn next_id() -> String {
    let id = ID_COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("view_list_{}", id)
}
