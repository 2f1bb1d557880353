//! Authentication session store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use storefront_shared::{ApiError, LoginRequest, RegisterForm, User};
use tokio::sync::watch;

use super::{Reducer, Store};
use crate::api_client::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// A session request started.
    Pending,
    /// Login, registration or profile fetch succeeded.
    Authenticated(User),
    /// A request that does not change the user finished.
    Settled,
    /// A request failed; the current user is kept.
    Failed(String),
    /// The stored credential was refused and has been discarded.
    CredentialRejected(String),
    LoggedOut,
    /// The backend answered 401 somewhere.
    Expired,
    ClearError,
}

impl Reducer for SessionState {
    type Action = SessionAction;

    fn reduce(&mut self, action: SessionAction) {
        match action {
            SessionAction::Pending => {
                self.is_loading = true;
                self.error = None;
            }
            SessionAction::Authenticated(user) => {
                self.user = Some(user);
                self.is_authenticated = true;
                self.is_loading = false;
            }
            SessionAction::Settled => {
                self.is_loading = false;
            }
            SessionAction::Failed(message) => {
                self.is_loading = false;
                self.error = Some(message);
            }
            SessionAction::CredentialRejected(message) => {
                *self = SessionState {
                    error: Some(message),
                    ..SessionState::default()
                };
            }
            SessionAction::LoggedOut | SessionAction::Expired => {
                *self = SessionState::default();
            }
            SessionAction::ClearError => {
                self.error = None;
            }
        }
    }
}

/// Session state plus the auth calls that drive it.
#[derive(Clone)]
pub struct SessionStore {
    store: Store<SessionState>,
    api: ApiClient,
    init_attempted: Arc<AtomicBool>,
}

impl SessionStore {
    /// Create the store and reset it whenever the gateway sees a 401.
    pub fn new(api: ApiClient) -> Self {
        let store = Store::new(SessionState::default());
        let on_expired = store.clone();
        api.on_unauthorized(move || on_expired.dispatch(SessionAction::Expired));
        Self {
            store,
            api,
            init_attempted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.store.subscribe()
    }

    pub fn dispatch(&self, action: SessionAction) {
        self.store.dispatch(action);
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.read(|s| s.is_authenticated)
    }

    pub fn user(&self) -> Option<User> {
        self.store.read(|s| s.user.clone())
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, ApiError> {
        self.store.dispatch(SessionAction::Pending);
        match self.api.login(credentials).await {
            Ok(auth) => {
                crate::log_info!("logged in as {}", auth.user.email);
                self.store.dispatch(SessionAction::Authenticated(auth.user.clone()));
                Ok(auth.user)
            }
            Err(e) => {
                self.store.dispatch(SessionAction::Failed(e.message_or("Login failed")));
                Err(e)
            }
        }
    }

    pub async fn register(&self, form: &RegisterForm) -> Result<User, ApiError> {
        self.store.dispatch(SessionAction::Pending);
        match self.api.register(form).await {
            Ok(auth) => {
                crate::log_info!("registered {}", auth.user.email);
                self.store.dispatch(SessionAction::Authenticated(auth.user.clone()));
                Ok(auth.user)
            }
            Err(e) => {
                self.store.dispatch(SessionAction::Failed(e.message_or("Registration failed")));
                Err(e)
            }
        }
    }

    /// Forget the token and the user. Never fails.
    pub fn logout(&self) {
        self.api.logout();
        self.store.dispatch(SessionAction::LoggedOut);
    }

    /// Load the user behind the stored token.
    ///
    /// A 401 or 404 means the token is no longer any good, so it is discarded.
    pub async fn get_current_user(&self) -> Result<User, ApiError> {
        self.store.dispatch(SessionAction::Pending);
        match self.api.current_user().await {
            Ok(user) => {
                self.store.dispatch(SessionAction::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                let message = e.message_or("Failed to get current user");
                if e.is_unauthorized() || e.is_not_found() {
                    crate::log_warn!("discarding stored credential: {}", e);
                    // The gateway already dropped the token on 401.
                    if e.is_not_found() {
                        self.api.credentials().clear();
                    }
                    self.store.dispatch(SessionAction::CredentialRejected(message));
                } else {
                    self.store.dispatch(SessionAction::Failed(message));
                }
                Err(e)
            }
        }
    }

    /// Restore the session from a stored token, once per store.
    ///
    /// Returns `None` when nothing was attempted: no token, already
    /// authenticated, or an earlier call already tried.
    pub async fn init(&self) -> Option<Result<User, ApiError>> {
        if !self.api.credentials().has_token() || self.is_authenticated() {
            return None;
        }
        if self.init_attempted.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.get_current_user().await)
    }

    pub async fn refresh_token(&self) -> Result<(), ApiError> {
        match self.api.refresh_token().await {
            Ok(_) => Ok(()),
            Err(e) => {
                let message = e.message_or("Failed to refresh session");
                self.store.dispatch(SessionAction::Failed(message));
                Err(e)
            }
        }
    }

    /// Refresh the token when it is within the configured threshold of expiry.
    ///
    /// Returns whether a refresh was attempted.
    pub async fn refresh_if_needed(&self) -> Result<bool, ApiError> {
        let threshold = self.api.auth_config().refresh_threshold;
        let Some(token) = self.api.credentials().load() else {
            return Ok(false);
        };
        if token.is_expired() || !token.needs_refresh(threshold) {
            return Ok(false);
        }
        self.refresh_token().await.map(|_| true)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.store.dispatch(SessionAction::Pending);
        let result = self.api.forgot_password(email).await;
        self.settle(result, "Failed to send password reset email")
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), ApiError> {
        self.store.dispatch(SessionAction::Pending);
        let result = self.api.reset_password(token, password).await;
        self.settle(result, "Failed to reset password")
    }

    fn settle(&self, result: Result<(), ApiError>, default: &str) -> Result<(), ApiError> {
        match &result {
            Ok(()) => self.store.dispatch(SessionAction::Settled),
            Err(e) => {
                let message = e.message_or(default);
                self.store.dispatch(SessionAction::Failed(message));
            }
        }
        result
    }

    pub fn clear_error(&self) {
        self.store.dispatch(SessionAction::ClearError);
    }
}
