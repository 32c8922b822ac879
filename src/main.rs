use chrono::Local;
use clap::Parser;
use salon_admin::adapters::{export, photo};
use salon_admin::config::cli::{AddUserArgs, Command, EditUserArgs, UsersCommand};
use salon_admin::config::toml_config::AuthConfig;
use salon_admin::core::dashboard::CarouselLayout;
use salon_admin::core::users::{find_user, AddUserForm, ProfileView};
use salon_admin::domain::model::{EditUserRequest, NoticeKind, PageToken};
use salon_admin::domain::ports::ConfigProvider;
use salon_admin::utils::error::ErrorSeverity;
use salon_admin::utils::{logger, validation::Validate, validation::validate_required_field};
use salon_admin::{
    AdminError, AdminSession, CliConfig, DashboardSummary, FirebaseAuth, HttpUserDirectory,
    NoticeBoard, PagerState, Result, TomlConfig, UserManager,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI args: {:?}", cli.command);

    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig, config: &TomlConfig) -> Result<()> {
    match &cli.command {
        Command::Login => {
            let auth = validate_required_field("auth", &config.auth)?;
            let identity = sign_in_admin(auth, config).await?;
            println!("✅ Signed in as {} (admin)", identity.email);
            Ok(())
        }
        command => {
            match config.auth() {
                Some(auth) => {
                    sign_in_admin(auth, config).await?;
                }
                None => tracing::warn!("No [auth] section configured; skipping admin sign-in"),
            }

            let directory = HttpUserDirectory::from_config(config)?;
            let manager = UserManager::new(directory, NoticeBoard::new(config.notice_dismiss_after()));
            match command {
                Command::Dashboard { width } => show_dashboard(&manager, *width).await,
                Command::Users { action } => run_users(&manager, config, action).await,
                Command::Login => Ok(()),
            }
        }
    }
}

async fn sign_in_admin(auth: &AuthConfig, config: &TomlConfig) -> Result<salon_admin::domain::model::Identity> {
    let email = validate_required_field("auth.email", &auth.email)?;
    let password = validate_required_field("auth.password", &auth.password)?;
    let firebase = FirebaseAuth::new(
        &auth.api_key,
        auth.identity_endpoint(),
        &auth.database_url,
        config.request_timeout(),
    )?;
    let mut session = AdminSession::new(firebase.clone(), firebase);
    session.login(email, password).await
}

async fn show_dashboard(manager: &UserManager<HttpUserDirectory>, width: u32) -> Result<()> {
    let list = manager.refresh().await?;
    let summary = DashboardSummary::build(&list, &Local::now());

    println!("DASHBOARD");
    println!(
        "Total Users: {}    ({})",
        summary.user_count.formatted_count, summary.user_count.as_of
    );

    println!("\nUSER GRAPH");
    for point in &summary.signups {
        println!("  {:<10} {:>4} {}", point.month, point.user_count, "#".repeat(point.user_count));
    }

    if !summary.feedback.is_empty() {
        println!("\nUSER FEEDBACK");
        let layout = CarouselLayout::for_width(width);
        for (step, frame) in layout.frames(summary.feedback.len()).into_iter().enumerate() {
            println!("  [slide {}]", step + 1);
            for entry in &summary.feedback[frame] {
                println!(
                    "    {} {} \"{}\"",
                    entry.stars.render(),
                    entry.full_name.as_deref().unwrap_or("Anonymous"),
                    entry.feedback
                );
            }
        }
    }

    Ok(())
}

async fn run_users(
    manager: &UserManager<HttpUserDirectory>,
    config: &TomlConfig,
    action: &UsersCommand,
) -> Result<()> {
    let today = Local::now().date_naive();

    match action {
        UsersCommand::List { page, .. } => {
            let list = manager.refresh().await?;
            let pager = PagerState::new(list.count, config.page_size(), config.sibling_count())?
                .with_page(*page);

            for user in pager.slice(&list.user_list) {
                println!(
                    "{:<30} {:<24} {:<32} {}",
                    user.uid,
                    user.full_name.as_deref().unwrap_or("-"),
                    user.email.as_deref().unwrap_or("-"),
                    user.role.as_deref().unwrap_or("-"),
                );
            }
            if pager.is_visible() {
                println!("Total number of users: {}", pager.total_count());
                println!("{}", render_pager(&pager));
            }
            Ok(())
        }
        UsersCommand::Show { uid } => {
            let list = manager.refresh().await?;
            let user = find_user(&list, uid).ok_or_else(|| AdminError::InvalidArgument {
                field: "uid".to_string(),
                reason: format!("no user with uid {}", uid),
            })?;
            let view = ProfileView::from_record(user, today);
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(())
        }
        UsersCommand::Add(args) => {
            let form = add_form(args)?;
            let result = manager.add_user(form, today).await;
            report(manager, result, "User added successfully.")
        }
        UsersCommand::Edit(args) => {
            let list = manager.refresh().await?;
            let request = edit_request(&list, args)?;
            let result = manager.edit_user(&args.uid, &request).await;
            report(manager, result, "User updated successfully.")
        }
        UsersCommand::Delete { uid } => {
            let result = manager.delete_user(uid).await;
            report(manager, result, "User deleted successfully.")
        }
        UsersCommand::Export { output } => {
            let list = manager.refresh().await?;
            export::export_users_csv(&list.user_list, output)?;
            println!("📁 Output saved to: {}", output.display());
            Ok(())
        }
    }
}

fn report(manager: &UserManager<HttpUserDirectory>, result: Result<()>, message: &str) -> Result<()> {
    match manager.notices().current() {
        Some(NoticeKind::Success) => println!("✅ {}", message),
        Some(NoticeKind::Failure) => eprintln!("❌ Request failed"),
        None => {}
    }
    result
}

fn add_form(args: &AddUserArgs) -> Result<AddUserForm> {
    let photo_base64 = match &args.photo {
        Some(path) => photo::encode_photo_file(path)?,
        None => String::new(),
    };
    Ok(AddUserForm {
        email: args.email.clone(),
        password: args.password.clone(),
        full_name: args.full_name.clone(),
        role: args.role.clone(),
        gender: args.gender.clone(),
        dob: args.dob.clone(),
        phone_number: args.phone_number.clone(),
        photo_base64,
    })
}

fn edit_request(
    list: &salon_admin::domain::model::UserListResponse,
    args: &EditUserArgs,
) -> Result<EditUserRequest> {
    let current = find_user(list, &args.uid).ok_or_else(|| AdminError::InvalidArgument {
        field: "uid".to_string(),
        reason: format!("no user with uid {}", args.uid),
    })?;
    let photo_base64 = match &args.photo {
        Some(path) => photo::encode_photo_file(path)?,
        None => String::new(),
    };
    let keep = |new: &Option<String>, old: &Option<String>| {
        new.clone().or_else(|| old.clone()).unwrap_or_default()
    };

    Ok(EditUserRequest {
        full_name: keep(&args.full_name, &current.full_name),
        role: keep(&args.role, &current.role),
        gender: keep(&args.gender, &current.gender),
        phone_number: keep(&args.phone_number, &current.phone_number),
        photo_base64,
    })
}

fn render_pager(pager: &PagerState) -> String {
    let mut parts = Vec::new();
    if pager.has_previous() {
        parts.push("‹".to_string());
    }
    for token in pager.range() {
        match token {
            PageToken::PageNumber(n) if n == pager.current_page() => parts.push(format!("[{}]", n)),
            token => parts.push(token.to_string()),
        }
    }
    if pager.has_next() {
        parts.push("›".to_string());
    }
    parts.join(" ")
}
