use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::services::validation::ValidationError;

/// Account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub social_provider: Option<String>,
    #[serde(default)]
    pub social_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// OAuth providers the backend can exchange codes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SocialProvider {
    Naver,
    Kakao,
}

impl SocialProvider {
    fn authorize_endpoint(self) -> &'static str {
        match self {
            SocialProvider::Naver => "https://nid.naver.com/oauth2.0/authorize",
            SocialProvider::Kakao => "https://kauth.kakao.com/oauth/authorize",
        }
    }

    /// Provider consent page the user is sent to. The provider redirects
    /// back to `redirect_uri` with the code for [`SocialLoginRequest`].
    pub fn authorize_url(
        self,
        client_id: &str,
        redirect_uri: &str,
        state: Option<&str>,
    ) -> Result<reqwest::Url, ValidationError> {
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
        ];
        if let Some(state) = state {
            params.push(("state", state));
        }
        reqwest::Url::parse_with_params(self.authorize_endpoint(), &params)
            .map_err(|e| ValidationError::InvalidUrl(e.to_string()))
    }
}

/// Authorization code handed back by the provider's redirect.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SocialLoginRequest {
    #[garde(length(chars, min = 1, max = 500))]
    pub code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(length(chars, max = 100))]
    pub state: Option<String>,

    #[garde(url, length(chars, max = 500))]
    pub redirect_uri: String,
}

/// Tokens issued by social login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct ProfileUpdate {
    #[garde(length(chars, min = 2, max = 50))]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}
