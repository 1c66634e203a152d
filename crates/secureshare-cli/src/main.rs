//! SecureShare CLI — command-line client for the SecureShare backend.
//!
//! Configure with SECURESHARE_API_URL (default http://localhost:8080). The
//! session (token + profile) persists in ~/.config/secureshare/session.json
//! so a new invocation restores it without a network round trip.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use secureshare_api_client::ApiClient;
use secureshare_cli::flows::audit::AuditView;
use secureshare_cli::flows::dashboard::Dashboard;
use secureshare_cli::flows::download::{self, DownloadPage, PageState};
use secureshare_cli::flows::upload::UploadForm;
use secureshare_cli::{format_date, format_file_size, init_tracing};
use secureshare_core::{ClientConfig, FileSessionStorage, SessionHandle, SessionState};

#[derive(Parser)]
#[command(
    name = "secureshare",
    about = "Share files through one-time, OTP-protected download links"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// Log in with an existing account
    Login { email: String, password: String },
    /// Clear the stored session
    Logout,
    /// Show the current session
    Whoami {
        /// Also check the token against the server
        #[arg(long)]
        verify: bool,
    },
    /// Upload a file and generate a one-time download link
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Recipient email (at least one of --email/--phone is required)
        #[arg(long)]
        email: Option<String>,
        /// Recipient phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// List your uploaded files
    Files,
    /// Delete an uploaded file
    Delete {
        /// File id as shown by `files`
        id: String,
    },
    /// Show download link metadata and remaining time
    Info {
        /// Link identifier
        uuid: Uuid,
        /// Re-render the countdown once per second until expiry
        #[arg(long)]
        watch: bool,
    },
    /// Verify an OTP and download the file
    Download {
        /// Link identifier
        uuid: Uuid,
        /// One-time password from the recipient's email
        #[arg(long)]
        otp: String,
        /// Directory to save into (defaults to the current directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// View the audit log
    Audit {
        /// Client-side substring filter (filename, recipient, IP, action)
        #[arg(long)]
        filter: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let session = SessionHandle::new(Arc::new(FileSessionStorage::new(
        config.session_file.clone(),
    )));
    session.initialize();

    let client = ApiClient::new(&config, session.clone())
        .context("Failed to create API client")?
        .with_forced_logout_hook(|| {
            eprintln!("Your session has expired. Log in again with `secureshare login`.");
        });

    let cli = Cli::parse();

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => match client.register(&name, &email, &password).await {
            Ok(auth) => println!("Registered and logged in as {}", auth.user.email),
            Err(err) if err.status().is_some() => {
                eprintln!("Registration failed: {}", err);
                std::process::exit(1);
            }
            Err(err) => return Err(err).context("Registration request failed"),
        },
        Commands::Login { email, password } => match client.login(&email, &password).await {
            Ok(auth) => println!("Logged in as {}", auth.user.email),
            Err(err) if err.is_unauthorized() => {
                eprintln!("Login failed: invalid email or password");
                std::process::exit(1);
            }
            Err(err) => return Err(err).context("Login request failed"),
        },
        Commands::Logout => {
            session.clear();
            println!("Logged out");
        }
        Commands::Whoami { verify } => match session.state() {
            SessionState::Authenticated(user) => {
                let name = user.name.unwrap_or_else(|| "-".to_string());
                println!("{} <{}> (id {})", name, user.email, user.id);
                if verify {
                    // a stale token is torn down by the 401 path before
                    // this error surfaces
                    match client.verify_token().await {
                        Ok(()) => println!("Session is valid"),
                        Err(err) if err.is_unauthorized() => std::process::exit(1),
                        Err(err) => return Err(err).context("Verify request failed"),
                    }
                }
            }
            _ => println!("Not logged in"),
        },
        Commands::Upload { file, email, phone } => {
            require_login(&session);

            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            let filename = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("File path has no usable file name")?
                .to_string();

            let mut form = UploadForm::new(config.max_upload_bytes);
            if let Err(err) = form.select_file(filename, bytes) {
                eprintln!("{}", err);
                std::process::exit(1);
            }
            form.recipient_email = email.unwrap_or_default();
            form.recipient_phone = phone.unwrap_or_default();

            match form.submit(&client).await {
                Ok(response) => {
                    println!("File encrypted and upload link generated successfully!");
                    println!("  id:         {}", response.id);
                    println!("  file:       {}", response.filename);
                    println!("  size:       {}", format_file_size(response.size));
                    println!("  expires:    {}", format_date(&response.expiry_date));
                    println!("  link:       {}", response.download_link);
                }
                Err(err) => {
                    eprintln!("Failed to upload file: {}", err);
                    std::process::exit(1);
                }
            }
        }
        Commands::Files => {
            require_login(&session);

            let mut dashboard = Dashboard::new();
            dashboard
                .refresh(&client)
                .await
                .context("Failed to load files")?;

            if dashboard.files().is_empty() {
                println!("No files uploaded yet");
            } else {
                println!(
                    "{:<26} {:<28} {:>10} {:<12} {:<18} {}",
                    "ID", "FILE", "SIZE", "STATUS", "EXPIRES", "RECIPIENT"
                );
                for file in dashboard.files() {
                    println!(
                        "{:<26} {:<28} {:>10} {:<12} {:<18} {}",
                        file.id,
                        file.filename,
                        format_file_size(file.size),
                        file.status.as_str(),
                        format_date(&file.expiry_date),
                        file.recipient_email,
                    );
                }
                println!("\nDownload links:");
                for file in dashboard.files() {
                    println!("  {} -> {}", file.id, file.download_link);
                }
            }
        }
        Commands::Delete { id } => {
            require_login(&session);

            let mut dashboard = Dashboard::new();
            dashboard
                .remove(&client, &id)
                .await
                .with_context(|| format!("Failed to delete file {}", id))?;
            println!("Deleted {}", id);
        }
        Commands::Info { uuid, watch } => {
            let mut page = DownloadPage::new(uuid);
            if let PageState::Unavailable { message } = page.fetch(&client).await {
                eprintln!("{}", message);
                std::process::exit(1);
            }

            // fetch() only leaves Loading for Unavailable or Ready
            if let Some(info) = page.info() {
                println!("File:     {}", info.filename);
                println!("Size:     {}", format_file_size(info.size));
                println!("From:     {}", info.uploader_email);
                println!("Uploaded: {}", format_date(&info.upload_date));
                println!("Expires:  {}", format_date(&info.expiry_date));
            }

            print_remaining(&page);
            if watch {
                let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
                ticker.tick().await; // first tick fires immediately
                while !page.is_expired_at(chrono::Utc::now()) {
                    ticker.tick().await;
                    print_remaining(&page);
                }
            }
        }
        Commands::Download { uuid, otp, output } => {
            let mut page = DownloadPage::new(uuid);
            if let PageState::Unavailable { message } = page.fetch(&client).await {
                eprintln!("{}", message);
                std::process::exit(1);
            }
            if !page.can_enter_otp(chrono::Utc::now()) {
                eprintln!("{}", download::MSG_GONE);
                std::process::exit(1);
            }

            page.otp_input = otp;
            match page.submit_otp(&client).await {
                Ok(file) => {
                    let dir = output.unwrap_or_else(|| PathBuf::from("."));
                    let path = dir.join(&file.filename);
                    tokio::fs::write(&path, &file.bytes)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("File downloaded successfully: {}", path.display());
                    println!("This link is no longer valid.");
                }
                Err(err) => {
                    eprintln!("{}", err);
                    std::process::exit(1);
                }
            }
        }
        Commands::Audit { filter } => {
            require_login(&session);

            let mut view = AuditView::new();
            view.refresh(&client)
                .await
                .context("Failed to load audit logs")?;

            let term = filter.unwrap_or_default();
            let logs = view.filtered(&term);
            if logs.is_empty() {
                println!("No audit entries match");
            } else {
                println!(
                    "{:<18} {:<10} {:<28} {:>10} {:<16} {}",
                    "TIME", "ACTION", "FILE", "SIZE", "IP", "RECIPIENT"
                );
                for log in logs {
                    println!(
                        "{:<18} {:<10} {:<28} {:>10} {:<16} {}",
                        format_date(&log.timestamp),
                        log.action.as_str(),
                        log.filename,
                        format_file_size(log.file_size),
                        log.ip_address,
                        log.recipient_email,
                    );
                }
            }
        }
    }

    Ok(())
}

/// Advisory gating only: the server re-checks authorization on every call,
/// and a stale session is torn down by the 401 path.
fn require_login(session: &SessionHandle) {
    if !session.is_authenticated() {
        eprintln!("You are not logged in. Run `secureshare login <email> <password>` first.");
        std::process::exit(1);
    }
}

fn print_remaining(page: &DownloadPage) {
    if let Some(remaining) = page.time_remaining(chrono::Utc::now()) {
        println!("Time remaining: {}", download::format_remaining(remaining));
    }
}
