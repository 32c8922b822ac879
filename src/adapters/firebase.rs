//! Identity and role lookups against the Firebase REST APIs: Identity Toolkit
//! for email/password sign-in and the Realtime Database for profile roles.

use crate::domain::model::{Identity, Role};
use crate::domain::ports::{IdentityProvider, RoleDirectory};
use crate::utils::error::{AdminError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
pub const PROFILE_PATH: &str = "User_Profiling";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
}

#[derive(Deserialize)]
struct FirebaseErrorEnvelope {
    error: FirebaseError,
}

#[derive(Deserialize)]
struct FirebaseError {
    message: String,
}

#[derive(Deserialize)]
struct ProfileRole {
    #[serde(default)]
    role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FirebaseAuth {
    client: Client,
    api_key: String,
    identity_endpoint: Url,
    database_url: Url,
}

fn parse_url(field: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| AdminError::InvalidConfigValueError {
        field: field.to_string(),
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

impl FirebaseAuth {
    pub fn new(
        api_key: &str,
        identity_endpoint: &str,
        database_url: &str,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key: api_key.to_string(),
            identity_endpoint: parse_url("auth.identity_endpoint", identity_endpoint)?,
            database_url: parse_url("auth.database_url", database_url)?,
        })
    }

    fn sign_in_url(&self) -> Url {
        let mut url = with_segments(
            &self.identity_endpoint,
            &["v1", "accounts:signInWithPassword"],
        );
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    fn profile_url(&self, identity: &Identity) -> Url {
        let file = format!("{}.json", identity.uid);
        let mut url = with_segments(&self.database_url, &[PROFILE_PATH, file.as_str()]);
        url.query_pairs_mut().append_pair("auth", &identity.id_token);
        url
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity> {
        let response = self
            .client
            .post(self.sign_in_url())
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<FirebaseErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("identity service answered {}", status));
            tracing::warn!("Sign-in rejected for {}: {}", email, message);
            return Err(AdminError::AuthenticationError { message });
        }

        let signed_in: SignInResponse = response.json().await?;
        Ok(Identity {
            uid: signed_in.local_id,
            email: signed_in.email.unwrap_or_else(|| email.to_string()),
            id_token: signed_in.id_token,
        })
    }
}

#[async_trait]
impl RoleDirectory for FirebaseAuth {
    async fn role_of(&self, identity: &Identity) -> Result<Option<Role>> {
        let response = self.client.get(self.profile_url(identity)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::RequestFailed {
                endpoint: format!("{}/{}", PROFILE_PATH, identity.uid),
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        // The database answers `null` for a missing profile.
        let profile: Option<ProfileRole> = response.json().await?;
        Ok(profile
            .and_then(|profile| profile.role)
            .and_then(|role| Role::parse(&role)))
    }
}
