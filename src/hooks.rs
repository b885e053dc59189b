//! Conversions from plain closures into the boxed hooks a `ViewList` stores
use crate::errors::BoxError;
use crate::types::{CreateHook, RemoveHook, Removable};
use futures::FutureExt;
use futures::future;
use std::future::Future;
use std::sync::Arc;

/// Wrap an async creation closure.
pub fn create<M, V, C, F, Fut, E>(f: F) -> CreateHook<M, V, C>
where
    F: Fn(&C, &M, usize) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
    E: Into<BoxError>,
    M: 'static,
    V: 'static,
    C: 'static,
{
    Arc::new(move |ctx: &C, model: &M, index: usize| {
        f(ctx, model, index).map(|res| res.map_err(Into::<BoxError>::into)).boxed()
    })
}

/// Wrap a creation closure that produces its view immediately.
pub fn create_sync<M, V, C, F, E>(f: F) -> CreateHook<M, V, C>
where
    F: Fn(&C, &M, usize) -> Result<V, E> + Send + Sync + 'static,
    E: Into<BoxError>,
    M: 'static,
    V: Send + 'static,
    C: 'static,
{
    Arc::new(move |ctx: &C, model: &M, index: usize| {
        future::ready(f(ctx, model, index).map_err(Into::<BoxError>::into)).boxed()
    })
}

pub fn remove<V, C, F, E>(f: F) -> RemoveHook<V, C>
where
    F: Fn(&C, V) -> Result<(), E> + Send + Sync + 'static,
    E: Into<BoxError>,
    V: 'static,
    C: 'static,
{
    Arc::new(move |ctx: &C, view: V| f(ctx, view).map_err(Into::<BoxError>::into))
}

/// Default removal hook: ask the view to remove itself.
pub fn removable<V: Removable + 'static, C: 'static>() -> RemoveHook<V, C> {
    Arc::new(|_: &C, view: V| view.remove())
}
