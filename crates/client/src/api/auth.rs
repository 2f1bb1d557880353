//! `/auth` endpoints.

use storefront_shared::{
    ApiError, AuthResponse, AuthUser, ForgotPasswordRequest, LoginRequest, RefreshResponse,
    RegisterForm, RegisterRequest, ResetPasswordRequest, User,
};

use crate::api_client::ApiClient;

impl ApiClient {
    /// Log in and persist the issued token.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthUser, ApiError> {
        let resp: AuthResponse = self.post_json("/auth/login", credentials).await?;
        Ok(self.accept_auth(resp))
    }

    /// Create an account and persist the issued token.
    pub async fn register(&self, form: &RegisterForm) -> Result<AuthUser, ApiError> {
        let body = RegisterRequest::from(form);
        let resp: AuthResponse = self.post_json("/auth/register", &body).await?;
        Ok(self.accept_auth(resp))
    }

    fn accept_auth(&self, resp: AuthResponse) -> AuthUser {
        if !resp.access_token.is_empty() {
            self.store_token(&resp.access_token);
        }
        AuthUser {
            user: resp.user,
            token: resp.access_token,
        }
    }

    /// Drop the stored token. Purely local; the API has no logout endpoint.
    pub fn logout(&self) {
        self.credentials().clear();
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get_json("/auth/profile").await
    }

    /// Exchange the current token for a new one and persist it.
    pub async fn refresh_token(&self) -> Result<String, ApiError> {
        let resp: RefreshResponse = self.post_empty("/auth/refresh").await?;
        self.store_token(&resp.access_token);
        Ok(resp.access_token)
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        let _: serde_json::Value = self.post_json("/auth/forgot-password", &body).await?;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> Result<(), ApiError> {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        let _: serde_json::Value = self.post_json("/auth/reset-password", &body).await?;
        Ok(())
    }
}
