//! Worker draining the notification queue and delivering email.
//!
//! Runs separately from the HTTP server so delivery latency, retries, and
//! mail-endpoint outages never touch the request path. Consumes the same
//! Apalis PostgreSQL storage the server enqueues into.

use apalis_core::task::data::Data;
use apalis_core::worker::builder::WorkerBuilder;
use apalis_core::monitor::Monitor;
use apalis_postgres::PostgresStorage;
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use backend::domain::Notification;
use backend::outbound::{HttpMailer, MailerError};

/// Notification delivery worker.
#[derive(Debug, Parser)]
#[command(name = "notifications-worker")]
struct Args {
    /// PostgreSQL connection string; defaults to $DATABASE_URL.
    #[arg(long)]
    database_url: Option<String>,
    /// Mail delivery endpoint; defaults to $MAILER_URL.
    #[arg(long)]
    mailer_url: Option<String>,
    /// Public site URL used for deep links; defaults to $SITE_URL.
    #[arg(long)]
    site_url: Option<String>,
    /// Sender address; defaults to $MAILER_FROM.
    #[arg(long)]
    mail_from: Option<String>,
}

fn resolve(cli: Option<String>, env_name: &str) -> Result<String> {
    cli.or_else(|| std::env::var(env_name).ok())
        .ok_or_else(|| eyre!("missing --{} / ${env_name}", env_name.to_lowercase()))
}

async fn deliver(notification: Notification, mailer: Data<HttpMailer>) -> Result<(), MailerError> {
    let kind = notification.kind();
    let recipient = notification.recipient().clone();
    match mailer.deliver(&notification).await {
        Ok(()) => {
            info!(?kind, %recipient, "notification delivered");
            Ok(())
        }
        Err(error) => {
            // Surface the failure to Apalis for its retry bookkeeping.
            warn!(?kind, %recipient, %error, "notification delivery failed");
            Err(error)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = Args::parse();
    let database_url = resolve(args.database_url, "DATABASE_URL")?;
    let mailer_url: Url = resolve(args.mailer_url, "MAILER_URL")?.parse()?;
    let site_url: Url = resolve(args.site_url, "SITE_URL")?.parse()?;
    let mail_from = args
        .mail_from
        .or_else(|| std::env::var("MAILER_FROM").ok())
        .unwrap_or_else(|| "no-reply@localhost".to_owned());

    let mailer = HttpMailer::new(mailer_url, site_url, mail_from);

    let pool = sqlx::PgPool::connect(&database_url).await?;
    PostgresStorage::setup(&pool).await?;
    let storage: PostgresStorage<Notification> = PostgresStorage::new(&pool);

    info!("notifications worker starting");
    Monitor::new()
        .register(move |_| {
            WorkerBuilder::new("notifications")
                .backend(storage.clone())
                .data(mailer.clone())
                .build(deliver)
        })
        .run()
        .await?;
    Ok(())
}
