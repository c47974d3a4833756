use chrono::Utc;
use garde::Validate;

use crate::models::auth::{
    ProfileResponse, ProfileUpdate, RefreshRequest, SocialLoginRequest, SocialProvider,
    TokenResponse, User,
};
use crate::services::client::{Ack, ApiClient, ApiError};
use crate::services::validation::SubmitError;
use crate::session::Session;

/// Client for sign-in and account management.
///
/// Sign-in is social only: the provider redirect hands the app an
/// authorization code, which the backend exchanges for its own tokens.
/// Account calls use whatever credential the wrapped [`ApiClient`] carries.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn social_login(
        &self,
        provider: SocialProvider,
        request: &SocialLoginRequest,
    ) -> Result<Session, SubmitError> {
        request.validate()?;
        tracing::info!(provider = %provider, "Exchanging social login code");

        let tokens: TokenResponse = self
            .client
            .without_credential()
            .post(&format!("/auth/{}", provider), request)
            .await?;

        let session = Session::from_tokens(tokens);
        tracing::info!(
            provider = %provider,
            user_id = session.user.as_ref().map(|u| u.id),
            "Signed in"
        );
        Ok(session)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get("/auth/me").await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, ApiError> {
        self.client
            .without_credential()
            .post("/auth/refresh", &RefreshRequest { refresh_token })
            .await
    }

    /// Rotate the session's tokens in place. Returns `false` when the
    /// session holds no refresh token.
    pub async fn refresh_session(&self, session: &mut Session) -> Result<bool, ApiError> {
        let Some(refresh_token) = session.refresh_token().map(str::to_string) else {
            return Ok(false);
        };

        let tokens = self.refresh(&refresh_token).await?;
        session.apply_refresh(tokens, Utc::now());
        tracing::debug!("Session tokens refreshed");
        Ok(true)
    }

    pub async fn revoke(&self) -> Result<Ack, ApiError> {
        self.client.post_empty("/auth/revoke").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, SubmitError> {
        update.validate()?;
        let response: ProfileResponse = self.client.put("/auth/profile", update).await?;
        Ok(response.user)
    }

    /// Permanently delete the account and everything it owns.
    pub async fn delete_account(&self) -> Result<Ack, ApiError> {
        tracing::warn!("Deleting account");
        self.client.delete("/auth/account").await
    }
}
