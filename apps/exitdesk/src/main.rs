use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use exit_client::{ApprovalController, ClientError, HttpApprovalApi};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod desk;
mod prompt;

use config::{load_settings, normalize_api_base, DEFAULT_CONFIG_FILE};
use desk::Desk;

#[derive(Parser, Debug)]
#[command(name = "exitdesk", about = "Submit and review student exit requests")]
struct Cli {
    /// Base URL of the approval service, e.g. http://127.0.0.1:8000/api
    #[arg(long, global = true)]
    api_base: Option<String>,
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Student {
        #[arg(long)]
        name: String,
        #[arg(long)]
        matric: String,
        #[command(subcommand)]
        action: StudentCommand,
    },
    Admin {
        #[arg(long)]
        name: String,
        /// Session token issued by the service; falls back to EXITDESK_ADMIN_TOKEN.
        #[arg(long)]
        token: Option<String>,
        #[command(subcommand)]
        action: AdminCommand,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum StudentCommand {
    Status,
    Send {
        #[arg(long)]
        reason: Option<String>,
    },
    Resend {
        #[arg(long)]
        reason: Option<String>,
    },
}

#[derive(Args, Debug)]
pub(crate) struct ActArgs {
    /// Role acting on the letter; prompted for when omitted.
    #[arg(long)]
    pub role: Option<String>,
    #[arg(long)]
    pub comment: Option<String>,
    #[arg(long)]
    pub recommendation: Option<String>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AdminCommand {
    Overview,
    Pending,
    Approve(ActArgs),
    Reject(ActArgs),
    Comment(ActArgs),
    Show {
        letter_id: i64,
    },
    History {
        letter_id: i64,
    },
    Queue {
        role: String,
    },
    Students,
    AddStudent {
        name: String,
    },
    ResetPassword {
        user_id: i64,
        #[arg(long)]
        yes: bool,
    },
    DeleteStudent {
        user_id: i64,
        #[arg(long)]
        yes: bool,
    },
    Notifications,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli.config);
    let api_base = normalize_api_base(cli.api_base.as_deref().unwrap_or(&settings.api_base))?;
    let api = HttpApprovalApi::new(&api_base, settings.request_timeout())
        .context("failed to build http client")?;
    info!(api_base = %api_base, "using approval service");

    let controller = ApprovalController::new(Arc::new(api))
        .with_default_actor_role(settings.default_actor_role.clone());
    let mut desk = Desk::new(controller);

    let outcome = match cli.command {
        Command::Student {
            name,
            matric,
            action,
        } => desk.student(&name, &matric, action).await,
        Command::Admin {
            name,
            token,
            action,
        } => {
            let token = token.or(settings.admin_token);
            desk.admin(&name, token, action).await
        }
    };
    desk.flush_notices();

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            // Client errors were already shown as notices.
            if err.downcast_ref::<ClientError>().is_none() {
                eprintln!("error: {err:#}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
