pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{firebase::FirebaseAuth, http::HttpUserDirectory};
pub use crate::core::{
    dashboard::DashboardSummary,
    notice::NoticeBoard,
    pagination::{compute_range, PagerState},
    session::AdminSession,
    users::UserManager,
};
pub use utils::error::{AdminError, Result};
