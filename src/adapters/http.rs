use crate::domain::model::{AddUserRequest, ApiErrorBody, EditUserRequest, UserListResponse};
use crate::domain::ports::{ConfigProvider, UserDirectory};
use crate::utils::error::{AdminError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use url::Url;

/// Client for the `/users` CRUD façade.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: Url,
}

impl HttpUserDirectory {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| AdminError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AdminError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout())
    }

    fn users_url(&self, uid: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("users");
            if let Some(uid) = uid {
                segments.push(uid);
            }
        }
        url
    }

    /// Maps a non-2xx answer to `RequestFailed`, using the body's `error`
    /// field when there is one.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);
        if status.is_success() {
            return Ok(response);
        }

        let endpoint = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|parsed| match parsed.error_message {
                Some(detail) => format!("{} ({})", parsed.error, detail),
                None => parsed.error,
            })
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        Err(AdminError::RequestFailed {
            endpoint,
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn list_users(&self) -> Result<UserListResponse> {
        let url = self.users_url(None);
        tracing::debug!("Making API request to: {}", url);
        let response = Self::check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn add_user(&self, request: &AddUserRequest) -> Result<()> {
        let url = self.users_url(None);
        tracing::debug!("POST {} for {}", url, request.email);
        Self::check(self.client.post(url).json(request).send().await?).await?;
        Ok(())
    }

    async fn edit_user(&self, uid: &str, request: &EditUserRequest) -> Result<()> {
        let url = self.users_url(Some(uid));
        tracing::debug!("PUT {}", url);
        Self::check(self.client.put(url).json(request).send().await?).await?;
        Ok(())
    }

    async fn delete_user(&self, uid: &str) -> Result<()> {
        let url = self.users_url(Some(uid));
        tracing::debug!("DELETE {}", url);
        Self::check(self.client.delete(url).send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_users_url_joins_base_path() {
        let directory = HttpUserDirectory::new("http://localhost:5000/api", Duration::from_secs(5)).unwrap();
        assert_eq!(directory.users_url(None).as_str(), "http://localhost:5000/api/users");

        let directory = HttpUserDirectory::new("http://localhost:5000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            directory.users_url(Some("a b/c")).as_str(),
            "http://localhost:5000/api/users/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(HttpUserDirectory::new("not a url", Duration::from_secs(5)).is_err());
        assert!(HttpUserDirectory::new("mailto:admin@example.com", Duration::from_secs(5)).is_err());
    }
}
