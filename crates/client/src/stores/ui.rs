//! Panels, toasts, modals and the global loading indicator.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use super::{Reducer, Store};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
    /// Display time in milliseconds; `None` keeps the toast until dismissed.
    pub duration: Option<u32>,
}

/// An entry in the modal stack. `name` tells the front end which dialog to
/// render; `props` is handed to it untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Modal {
    pub id: String,
    pub name: String,
    pub is_open: bool,
    pub props: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub sidebar_open: bool,
    pub cart_open: bool,
    pub search_open: bool,
    pub toasts: Vec<Toast>,
    /// Open modals in the order they were opened; the last one is on top.
    pub modals: Vec<Modal>,
    pub is_loading: bool,
}

impl UiState {
    /// The topmost modal that is still open.
    pub fn top_modal(&self) -> Option<&Modal> {
        self.modals.iter().rev().find(|m| m.is_open)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    ToggleSidebar,
    CloseSidebar,
    ToggleCart,
    CloseCart,
    ToggleSearch,
    CloseSearch,
    AddToast(Toast),
    RemoveToast(String),
    ClearToasts,
    OpenModal(Modal),
    /// Mark a modal closed but keep it on the stack until `RemoveModal`.
    CloseModal(String),
    RemoveModal(String),
    SetLoading(bool),
}

impl Reducer for UiState {
    type Action = UiAction;

    fn reduce(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            UiAction::CloseSidebar => self.sidebar_open = false,
            UiAction::ToggleCart => self.cart_open = !self.cart_open,
            UiAction::CloseCart => self.cart_open = false,
            UiAction::ToggleSearch => self.search_open = !self.search_open,
            UiAction::CloseSearch => self.search_open = false,
            UiAction::AddToast(toast) => self.toasts.push(toast),
            UiAction::RemoveToast(id) => self.toasts.retain(|t| t.id != id),
            UiAction::ClearToasts => self.toasts.clear(),
            UiAction::OpenModal(modal) => self.modals.push(modal),
            UiAction::CloseModal(id) => {
                if let Some(modal) = self.modals.iter_mut().find(|m| m.id == id) {
                    modal.is_open = false;
                }
            }
            UiAction::RemoveModal(id) => self.modals.retain(|m| m.id != id),
            UiAction::SetLoading(loading) => self.is_loading = loading,
        }
    }
}

#[derive(Clone, Default)]
pub struct UiStore {
    store: Store<UiState>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> UiState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.store.subscribe()
    }

    pub fn dispatch(&self, action: UiAction) {
        self.store.dispatch(action);
    }

    /// Queue a toast and return its id.
    pub fn add_toast(
        &self,
        kind: ToastKind,
        message: impl Into<String>,
        duration: Option<u32>,
    ) -> String {
        let id = Uuid::new_v4().to_string();
        self.store.dispatch(UiAction::AddToast(Toast {
            id: id.clone(),
            kind,
            message: message.into(),
            duration,
        }));
        id
    }

    pub fn remove_toast(&self, id: &str) {
        self.store.dispatch(UiAction::RemoveToast(id.to_string()));
    }

    /// Push an open modal onto the stack and return its id.
    pub fn open_modal(&self, name: impl Into<String>, props: serde_json::Value) -> String {
        let id = Uuid::new_v4().to_string();
        self.store.dispatch(UiAction::OpenModal(Modal {
            id: id.clone(),
            name: name.into(),
            is_open: true,
            props,
        }));
        id
    }

    pub fn close_modal(&self, id: &str) {
        self.store.dispatch(UiAction::CloseModal(id.to_string()));
    }

    pub fn remove_modal(&self, id: &str) {
        self.store.dispatch(UiAction::RemoveModal(id.to_string()));
    }
}
