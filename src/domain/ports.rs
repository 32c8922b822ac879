use crate::domain::model::{AddUserRequest, EditUserRequest, Identity, Role, UserListResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The CRUD façade in front of the user store.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self) -> Result<UserListResponse>;
    async fn add_user(&self, request: &AddUserRequest) -> Result<()>;
    async fn edit_user(&self, uid: &str, request: &EditUserRequest) -> Result<()>;
    async fn delete_user(&self, uid: &str) -> Result<()>;
}

/// Credential verification. Answers "who is this", never "may they".
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity>;

    async fn sign_out(&self, _identity: &Identity) -> Result<()> {
        Ok(())
    }
}

/// Role lookup in the profile store.
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    async fn role_of(&self, identity: &Identity) -> Result<Option<Role>>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn page_size(&self) -> usize;
    fn sibling_count(&self) -> usize;
    fn notice_dismiss_after(&self) -> Duration;
}
