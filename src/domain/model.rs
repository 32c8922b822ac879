use serde::{Deserialize, Serialize};

/// One row of the user list as served by `GET /api/users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "photo")]
    pub photo_url: Option<String>,
    /// Account creation time, RFC 2822 as the auth platform emits it.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, rename = "feedback")]
    pub feedback_text: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Legacy `DD/MM/YYYY`.
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// `count` covers every auth account, including ones with no profile row, so it
/// can exceed `user_list.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub user_list: Vec<UserRecord>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub gender: String,
    pub phone_number: String,
    pub photo_base64: String,
    /// Legacy `DD/MM/YYYY`.
    pub dob: String,
    /// Whole years, as a string.
    pub age: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRequest {
    pub full_name: String,
    pub role: String,
    pub gender: String,
    pub phone_number: String,
    pub photo_base64: String,
}

/// Body the façade sends back on failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_message: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageToken {
    PageNumber(usize),
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AgeBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Proof that credentials were accepted. Says nothing about permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub id_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}
