use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::TrackingClient;
use dashboard::{
    config::{load_settings, normalize_api_base_url},
    controller::{state::LookupStatus, DashboardController},
    view,
};
use shared::domain::MailProtocol;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Send tracked email and inspect open-tracking status")]
struct Cli {
    /// Base URL of the mail API, e.g. http://localhost:8080/api/mail
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose and send an email with a tracking pixel.
    Send {
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long)]
        protocol: Option<MailProtocol>,
        /// Check the tracking status of the sent message afterwards.
        #[arg(long)]
        check: bool,
    },
    /// Look up the tracking record for one tracking ID.
    Status { tracking_id: String },
    /// List every tracked email.
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings()?;
    if let Some(api_url) = cli.api_url.as_deref() {
        settings.api_base_url = normalize_api_base_url(api_url)?;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();
    info!(api_base_url = %settings.api_base_url, "dashboard starting");

    let api = Arc::new(TrackingClient::new(&settings.api_base_url)?);

    match cli.command {
        Command::Send {
            to,
            subject,
            body,
            protocol,
            check,
        } => {
            let controller = DashboardController::new(api);
            controller.update_send_form(|form| {
                if let Some(to) = to {
                    form.recipient_email = to;
                }
                if let Some(subject) = subject {
                    form.subject = subject;
                }
                if let Some(body) = body {
                    form.body = body;
                }
                if let Some(protocol) = protocol {
                    form.protocol = protocol;
                }
            });

            controller.send_email().await;
            let response = controller.send_response();
            println!("{}", view::render_send_response(response.as_ref()));
            if !response.is_some_and(|response| response.is_success()) {
                bail!("email was not sent");
            }

            if check {
                controller.check_status().await;
                println!("{}", view::render_tracking_data(&controller.tracking_data()));
            }
        }
        Command::Status { tracking_id } => {
            let controller = DashboardController::new(api);
            controller.set_tracking_id(tracking_id);
            controller.check_status().await;

            let data = controller.tracking_data();
            println!("{}", view::render_tracking_data(&data));
            match data.status {
                LookupStatus::Success => {}
                LookupStatus::Idle => bail!("tracking id must not be blank"),
                LookupStatus::NotFound | LookupStatus::Error => bail!("{}", data.message),
            }
        }
        Command::List => {
            let controller = DashboardController::start(api).await;
            let error = controller.all_tracking_error();
            println!(
                "{}",
                view::render_tracking_table(&controller.all_tracking_records(), error.as_deref())
            );
            if let Some(error) = error {
                bail!(error);
            }
        }
    }

    Ok(())
}
