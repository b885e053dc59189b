//! The paired model/view list and its update lifecycle
use crate::diff_engine::divergence;
use crate::errors::ViewListError;
use crate::hooks;
use crate::spawn::{Rejected, Spawn, TokioSpawner};
use crate::types::*;
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use log::{debug, trace, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Models and views, index-aligned. `generation` bumps on every mutation so a
/// pending total removal can tell whether the list moved on underneath it.
struct State<M, V> {
    models: Vec<M>,
    views: Vec<PendingView<V>>,
    generation: u64,
}

fn lock<M, V>(state: &Mutex<State<M, V>>) -> MutexGuard<'_, State<M, V>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered models paired 1:1 with the views built from them.
///
/// `update` keeps every view in the longest common prefix of the old and new
/// model sequences and rebuilds everything after it. Models and views are
/// mutated synchronously inside each call, so overlapping updates compose on
/// state even while earlier creations are still pending.
pub struct ViewList<M, V, C = ()> {
    id: String,
    state: Arc<Mutex<State<M, V>>>,
    create: CreateHook<M, V, C>,
    remove: RemoveHook<V, C>,
    context: Arc<C>,
    options: ViewListOptions,
    spawner: Arc<dyn Spawn>,
    disposed: bool,
}

impl<M, V, C> ViewList<M, V, C>
where
    M: PartialEq + Clone + Send + 'static,
    V: Removable + Clone + Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    /// Views remove themselves through [`Removable`].
    pub fn new(create: CreateHook<M, V, C>, context: impl Into<Arc<C>>) -> Self {
        Self::with_hooks(create, hooks::removable(), context)
    }
}

impl<M, V, C> ViewList<M, V, C>
where
    M: PartialEq + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    pub fn with_hooks(
        create: CreateHook<M, V, C>,
        remove: RemoveHook<V, C>,
        context: impl Into<Arc<C>>,
    ) -> Self {
        ViewList {
            id: next_id(),
            state: Arc::new(Mutex::new(State {
                models: Vec::new(),
                views: Vec::new(),
                generation: 0,
            })),
            create,
            remove,
            context: context.into(),
            options: ViewListOptions::default(),
            spawner: Arc::new(TokioSpawner),
            disposed: false,
        }
    }

    pub fn with_options(mut self, options: ViewListOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace where detached removals run. Defaults to [`TokioSpawner`].
    pub fn with_spawner(mut self, spawner: Arc<dyn Spawn>) -> Self {
        self.spawner = spawner;
        self
    }

    /// Label from the options, or the generated id.
    pub fn id(&self) -> &str {
        self.options.label.as_deref().unwrap_or(&self.id)
    }

    pub fn models(&self) -> Vec<M> {
        lock(&self.state).models.clone()
    }

    /// Snapshot of the current handles, index-aligned with [`models`](Self::models).
    pub fn views(&self) -> Vec<PendingView<V>> {
        lock(&self.state).views.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).views.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.state).views.is_empty()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Resolves once every current handle has resolved.
    pub fn ready(&self) -> BoxFuture<'static, Result<Vec<V>, ViewListError>> {
        future::try_join_all(self.views()).boxed()
    }

    pub fn update(&mut self, models: &[M]) -> BoxFuture<'static, Result<Vec<V>, ViewListError>> {
        self.update_with(models, UpdateOverrides::default())
    }

    /// Move to `models`, using any hooks or context in `overrides` for this call only.
    ///
    /// Creation hooks run before this returns, in ascending index order. The
    /// returned future resolves to every view in final order. Whether it also
    /// waits for removals depends on [`RemovalPolicy`], and on the spawner
    /// accepting detached work.
    pub fn update_with(
        &mut self,
        models: &[M],
        overrides: UpdateOverrides<M, V, C>,
    ) -> BoxFuture<'static, Result<Vec<V>, ViewListError>> {
        if self.disposed {
            return future::ready(Err(ViewListError::Disposed)).boxed();
        }

        let create = overrides.create.unwrap_or_else(|| Arc::clone(&self.create));
        let remove = overrides.remove.unwrap_or_else(|| Arc::clone(&self.remove));
        let context = overrides.context.unwrap_or_else(|| Arc::clone(&self.context));

        let mut state = lock(&self.state);
        let split = divergence(&state.models, models);
        debug!(
            "ViewList[{}]: update divergence={} removing={} creating={}",
            self.id(),
            split,
            state.models.len() - split,
            models.len() - split
        );

        let removed: Vec<_> = state.views.drain(split..).collect();
        let removal = if removed.is_empty() {
            None
        } else {
            Some(remove_in_order(self.id().to_owned(), removed, remove, Arc::clone(&context)))
        };

        for (index, model) in models.iter().enumerate().skip(split) {
            trace!("ViewList[{}]: create index={}", self.id(), index);
            let built = create(&*context, model, index);
            state.views.push(
                built
                    .map(move |res| res.map_err(|err| ViewListError::create(index, err)))
                    .boxed()
                    .shared(),
            );
        }
        state.models = models.to_vec();
        state.generation += 1;

        let ready = future::try_join_all(state.views.clone()).boxed();
        drop(state);

        let Some(removal) = removal else {
            return ready;
        };

        match self.options.removal {
            RemovalPolicy::Detached => {
                let id = self.id().to_owned();
                let task = async move {
                    if let Err(err) = removal.await {
                        warn!("ViewList[{}]: detached removal failed: {}", id, err);
                    }
                }
                .boxed();
                match self.spawner.spawn(task) {
                    Ok(()) => ready,
                    Err(Rejected(task)) => {
                        warn!(
                            "ViewList[{}]: spawner rejected removal, running it with this update",
                            self.id()
                        );
                        future::join(task, ready).map(|((), views)| views).boxed()
                    }
                }
            }
            RemovalPolicy::Awaited => async move {
                let (removed, views) = future::join(removal, ready).await;
                let views = views?;
                removed?;
                Ok::<_, ViewListError>(views)
            }
            .boxed(),
        }
    }

    /// Remove every view with the default hook and context.
    ///
    /// The returned future waits for all current handles, calls the hook on
    /// each view in list order and only then clears the list. If a handle
    /// failed or a hook errors, the list is left as it was. If an update ran
    /// while this was pending, the newer state is kept.
    pub fn remove(&mut self) -> BoxFuture<'static, Result<(), ViewListError>> {
        if self.disposed {
            return future::ready(Err(ViewListError::Disposed)).boxed();
        }

        let (views, generation) = {
            let state = lock(&self.state);
            (state.views.clone(), state.generation)
        };
        debug!("ViewList[{}]: removing all {} views", self.id(), views.len());
        let shared = Arc::clone(&self.state);
        let hook = Arc::clone(&self.remove);
        let context = Arc::clone(&self.context);
        let id = self.id().to_owned();

        async move {
            let resolved = future::try_join_all(views).await?;
            for view in resolved {
                hook(&*context, view).map_err(ViewListError::remove)?;
            }

            let mut state = lock(&*shared);
            if state.generation == generation {
                state.models.clear();
                state.views.clear();
                state.generation += 1;
            } else {
                warn!("ViewList[{}]: list changed during removal, keeping newer views", id);
            }
            Ok::<_, ViewListError>(())
        }
        .boxed()
    }

    /// Drop all state without calling any removal hook.
    pub fn dispose(&mut self) {
        let mut state = lock(&self.state);
        debug!("ViewList[{}]: disposed with {} views", self.id(), state.views.len());
        state.views = Vec::new();
        state.models = Vec::new();
        state.generation += 1;
        drop(state);
        self.disposed = true;
    }
}

/// Await each handle in list order and remove it. Handles that failed to
/// build have nothing to remove. A hook failure does not stop later removals.
async fn remove_in_order<V, C>(
    id: String,
    handles: Vec<PendingView<V>>,
    hook: RemoveHook<V, C>,
    context: Arc<C>,
) -> Result<(), ViewListError>
where
    V: Clone,
{
    let mut first_err = None;
    for handle in handles {
        match handle.await {
            Ok(view) => {
                trace!("ViewList[{}]: remove view", id);
                if let Err(err) = hook(&*context, view) {
                    first_err.get_or_insert(ViewListError::remove(err));
                }
            }
            Err(err) => debug!("ViewList[{}]: skipping removal of unbuilt view: {}", id, err),
        }
    }
    first_err.map_or(Ok(()), Err)
}
