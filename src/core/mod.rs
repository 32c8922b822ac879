pub mod dashboard;
pub mod date_math;
pub mod notice;
pub mod pagination;
pub mod session;
pub mod users;

pub use crate::domain::model::{AgeBreakdown, PageToken, UserListResponse, UserRecord};
pub use crate::domain::ports::{ConfigProvider, IdentityProvider, RoleDirectory, UserDirectory};
pub use crate::utils::error::Result;
