use crate::core::notice::DEFAULT_DISMISS_AFTER;
use crate::core::pagination::DEFAULT_SIBLING_COUNT;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_SIBLING_COUNT: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    pub auth: Option<AuthConfig>,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub api_key: String,
    pub identity_endpoint: Option<String>,
    pub database_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub page_size: Option<usize>,
    pub sibling_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub dismiss_after_ms: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
        }
    }
}

impl AuthConfig {
    pub fn identity_endpoint(&self) -> &str {
        self.identity_endpoint
            .as_deref()
            .unwrap_or(crate::adapters::firebase::DEFAULT_IDENTITY_ENDPOINT)
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdminError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AdminError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FIREBASE_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AdminError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn reject_unresolved(field: &str, value: &str) -> Result<()> {
        if value.contains("${") {
            return Err(AdminError::ConfigValidationError {
                field: field.to_string(),
                message: format!("unresolved environment variable in '{}'", value),
            });
        }
        Ok(())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        Self::reject_unresolved("api.base_url", &self.api.base_url)?;
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_positive_number("api.timeout_seconds", timeout, 1)?;
        }
        if let Some(page_size) = self.dashboard.page_size {
            validate_positive_number("dashboard.page_size", page_size, 1)?;
        }
        if let Some(sibling_count) = self.dashboard.sibling_count {
            validate_range("dashboard.sibling_count", sibling_count, 0, MAX_SIBLING_COUNT)?;
        }

        if let Some(auth) = &self.auth {
            Self::reject_unresolved("auth.api_key", &auth.api_key)?;
            validate_non_empty_string("auth.api_key", &auth.api_key)?;
            validate_url("auth.identity_endpoint", auth.identity_endpoint())?;
            Self::reject_unresolved("auth.database_url", &auth.database_url)?;
            validate_url("auth.database_url", &auth.database_url)?;
        }

        Ok(())
    }

    pub fn auth(&self) -> Option<&AuthConfig> {
        self.auth.as_ref()
    }
}

impl ConfigProvider for TomlConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds.unwrap_or(30))
    }

    fn page_size(&self) -> usize {
        self.dashboard.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn sibling_count(&self) -> usize {
        self.dashboard.sibling_count.unwrap_or(DEFAULT_SIBLING_COUNT)
    }

    fn notice_dismiss_after(&self) -> Duration {
        self.notifications
            .dismiss_after_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DISMISS_AFTER)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
