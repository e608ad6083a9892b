use crate::{
    conf::Settings,
    pkg::{
        internal::{service, status::ApplicationStatus, store},
        server::{listen, state::AppState},
    },
    prelude::Result,
};
use clap::{Args, Parser, Subcommand};

mod client;
mod migrate;

#[derive(Parser)]
#[command(about = "job application tracking dashboard")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Serve the dashboard and the JSON API
    Listen,
    /// Apply database migrations
    Migrate,
    /// Upsert the demo applications
    Seed,
    /// List applications, most recent first
    List {
        #[arg(long)]
        status: Option<ApplicationStatus>,
    },
    /// Add an application
    Add(AddArgs),
    /// Move an application to another status
    SetStatus { id: String, status: ApplicationStatus },
    /// Delete an application
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub company: String,
    #[arg(long)]
    pub role: String,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, default_value_t = ApplicationStatus::Applied)]
    pub status: ApplicationStatus,
    #[arg(long)]
    pub applied_at: Option<String>,
}

pub async fn run() -> Result<()> {
    let args = Cmd::parse();
    let settings = Settings::new()?;
    match args.command {
        Some(SubCommandType::Listen) => {
            let store = store::open(&settings).await?;
            listen(&settings, AppState::new(store.clone())).await?;
            store.close().await;
        }
        Some(SubCommandType::Migrate) => {
            migrate::apply(&settings).await?;
        }
        Some(SubCommandType::Seed) => {
            let store = store::open(&settings).await?;
            for app in service::seed(store.as_ref()).await? {
                println!("{}\t{} / {}\t{}", &app.id, &app.company, &app.role, &app.status);
            }
            store.close().await;
        }
        Some(SubCommandType::List { status }) => {
            client::list(&settings, status).await?;
        }
        Some(SubCommandType::Add(add)) => {
            client::add(&settings, add).await?;
        }
        Some(SubCommandType::SetStatus { id, status }) => {
            client::set_status(&settings, &id, status).await?;
        }
        Some(SubCommandType::Delete { id, yes }) => {
            client::delete(&settings, &id, yes).await?;
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
