use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "salon-admin")]
#[command(about = "Admin console for the salon booking app")]
pub struct CliConfig {
    #[arg(long, env = "SALON_ADMIN_CONFIG", help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "SALON_ADMIN_API_URL", help = "Base URL of the users API")]
    pub api_base_url: Option<String>,

    #[arg(long, env = "SALON_ADMIN_EMAIL")]
    pub email: Option<String>,

    #[arg(long, env = "SALON_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check that the credentials belong to an admin
    Login,
    /// Total users, sign-ups per month and feedback
    Dashboard {
        #[arg(long, default_value_t = 1280, help = "Viewport width for the feedback carousel")]
        width: u32,
    },
    Users {
        #[command(subcommand)]
        action: UsersCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum UsersCommand {
    List {
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long)]
        page_size: Option<usize>,
    },
    Show {
        uid: String,
    },
    Add(AddUserArgs),
    Edit(EditUserArgs),
    Delete {
        uid: String,
    },
    Export {
        #[arg(long, default_value = "./output/users.csv")]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct AddUserArgs {
    #[arg(long = "user-email")]
    pub email: String,
    #[arg(long = "user-password")]
    pub password: String,
    #[arg(long)]
    pub full_name: String,
    #[arg(long, default_value = "user")]
    pub role: String,
    #[arg(long, default_value = "")]
    pub gender: String,
    #[arg(long, help = "Date of birth, YYYY-MM-DD")]
    pub dob: String,
    #[arg(long)]
    pub phone_number: String,
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

/// Fields left out keep their current value.
#[derive(Debug, Clone, Args)]
pub struct EditUserArgs {
    pub uid: String,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub phone_number: Option<String>,
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

impl CliConfig {
    /// TOML file (or defaults) with command line values laid on top.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(url) = &self.api_base_url {
            config.api.base_url = url.clone();
        }
        if let Some(auth) = config.auth.as_mut() {
            if self.email.is_some() {
                auth.email = self.email.clone();
            }
            if self.password.is_some() {
                auth.password = self.password.clone();
            }
        }
        if let Command::Users {
            action: UsersCommand::List {
                page_size: Some(page_size),
                ..
            },
        } = &self.command
        {
            config.dashboard.page_size = Some(*page_size);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::ConfigProvider;

    #[test]
    fn test_parse_users_list() {
        let cli = CliConfig::try_parse_from([
            "salon-admin",
            "--api-base-url",
            "http://127.0.0.1:9000/api",
            "users",
            "list",
            "--page",
            "3",
            "--page-size",
            "20",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.api_base_url(), "http://127.0.0.1:9000/api");
        assert_eq!(config.page_size(), 20);
        assert!(matches!(
            cli.command,
            Command::Users {
                action: UsersCommand::List { page: 3, .. }
            }
        ));
    }

    #[test]
    fn test_parse_add_user() {
        let cli = CliConfig::try_parse_from([
            "salon-admin",
            "users",
            "add",
            "--user-email",
            "ana@example.com",
            "--user-password",
            "secret1",
            "--full-name",
            "Ana Lima",
            "--dob",
            "1990-03-17",
            "--phone-number",
            "0123",
        ])
        .unwrap();

        match cli.command {
            Command::Users {
                action: UsersCommand::Add(args),
            } => {
                assert_eq!(args.role, "user");
                assert_eq!(args.dob, "1990-03-17");
                assert!(args.photo.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
