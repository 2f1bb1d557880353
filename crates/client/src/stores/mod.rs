//! State containers for the storefront.
//!
//! Each domain has a plain state struct, an action enum and a pure
//! [`Reducer::reduce`] transition. [`Store`] is the dispatch boundary: it owns
//! the state, applies one action at a time and notifies subscribers.
//! The domain stores wrap a `Store` together with the [`ApiClient`] and turn
//! async API calls into pending/fulfilled/rejected actions.
//!
//! [`ApiClient`]: crate::api_client::ApiClient

use std::sync::Arc;

use tokio::sync::watch;

pub mod cart;
pub mod catalog;
pub mod session;
pub mod ui;

pub use cart::{CartAction, CartState, CartStore};
pub use catalog::{CatalogAction, CatalogState, CatalogStore};
pub use session::{SessionAction, SessionState, SessionStore};
pub use ui::{Modal, Toast, ToastKind, UiAction, UiState, UiStore};

/// A state slice and the transition applied for each of its actions.
pub trait Reducer {
    type Action;

    fn reduce(&mut self, action: Self::Action);
}

/// Owner of one state slice.
///
/// Every action is applied inside a single `send_modify`, so updates never
/// interleave. Nothing borrowed from the state is held across an `.await`.
pub struct Store<S> {
    state: Arc<watch::Sender<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S: Reducer> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn dispatch(&self, action: S::Action) {
        self.state.send_modify(|state| state.reduce(action));
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receiver that is notified after every dispatched action.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }
}

impl<S: Reducer + Clone> Store<S> {
    pub fn snapshot(&self) -> S {
        self.state.borrow().clone()
    }
}

impl<S: Reducer + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
