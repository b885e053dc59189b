//! Keeps an ordered list of views in step with an ordered list of models.
//!
//! A [`ViewList`] pairs each model with a (possibly still pending) view. On
//! [`ViewList::update`] it finds the first index where the new models diverge
//! from the old ones, removes every view from there on and creates views for
//! the new tail. Views in the common prefix are reused untouched.
//!
//! ```no_run
//! use view_list::{hooks, ViewList};
//!
//! # async fn demo() -> Result<(), view_list::ViewListError> {
//! let mut list: ViewList<&str, String> = ViewList::with_hooks(
//!     hooks::create_sync(|_: &(), model: &&str, index| {
//!         Ok::<_, std::io::Error>(format!("{index}:{model}"))
//!     }),
//!     hooks::remove(|_: &(), view: String| {
//!         println!("dropping {view}");
//!         Ok::<_, std::io::Error>(())
//!     }),
//!     (),
//! );
//! let views = list.update(&["a", "b"]).await?;
//! assert_eq!(views, ["0:a", "1:b"]);
//! # Ok(())
//! # }
//! ```
mod diff_engine;
mod errors;
pub mod hooks;
mod spawn;
mod types;
mod view_list;

pub use diff_engine::{divergence, plan, ListPatch, Patch, PatchAction};
pub use errors::{BoxError, HookError, ViewListError};
pub use spawn::{Rejected, Spawn, TokioSpawner};
pub use types::{
    ByRef, CreateHook, PendingView, RemovalPolicy, RemoveHook, Removable, UpdateOverrides,
    ViewListOptions,
};
pub use view_list::ViewList;
