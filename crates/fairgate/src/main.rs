// SPDX-FileCopyrightText: 2026 Fairgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fairgate - attendee credential issuance and batch notification dispatch.
//!
//! This is the binary entry point. The admin console normally calls the
//! dispatcher as a library; this CLI covers operational use: sending a
//! batch from a CSV roster export and probing the outbound channel.

mod roster;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fairgate_core::{DeliveryStatus, EventContext, HealthStatus, MessageTemplate, OutboundChannel};
use fairgate_credential::CredentialEncoder;
use fairgate_dispatch::BatchDispatcher;
use fairgate_smtp::SmtpChannel;

/// Fairgate - attendee credential issuance and batch notification dispatch.
#[derive(Parser, Debug)]
#[command(name = "fairgate", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Send one batch of notifications from a CSV roster.
    Dispatch {
        /// CSV roster with header `id,name,email,booth_id`.
        #[arg(long)]
        roster: PathBuf,

        /// Message template: check-in-credential, quiz-only, or vendor-rollup.
        #[arg(long)]
        template: MessageTemplate,

        /// Booth name shown in messages and bound into credentials.
        #[arg(long)]
        booth_name: String,

        /// Bazaar name shown in messages and bound into credentials.
        #[arg(long)]
        bazaar_name: String,

        /// Base URL for check-in deep links.
        #[arg(long)]
        check_in_base_url: String,

        /// Vendor recipient, required for the vendor-rollup template.
        #[arg(long)]
        vendor_email: Option<String>,

        /// Emit the report as JSON instead of a text summary.
        #[arg(long)]
        json: bool,
    },
    /// Probe the outbound channel: acquire it and report its health.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match fairgate_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            fairgate_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log.level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    let channel = Arc::new(SmtpChannel::new(config.smtp.clone()));

    let exit = match cli.command {
        Commands::Dispatch {
            roster,
            template,
            booth_name,
            bazaar_name,
            check_in_base_url,
            vendor_email,
            json,
        } => {
            let context = EventContext {
                booth_name,
                bazaar_name,
                check_in_base_url,
                vendor_email,
            };
            run_dispatch(&config, channel, &roster, &context, template, json).await
        }
        Commands::Doctor => run_doctor(channel).await,
    };

    std::process::exit(exit);
}

async fn run_dispatch(
    config: &fairgate_config::FairgateConfig,
    channel: Arc<SmtpChannel>,
    roster_path: &std::path::Path,
    context: &EventContext,
    template: MessageTemplate,
    json: bool,
) -> i32 {
    let attendees = match roster::load_roster(roster_path) {
        Ok(attendees) => attendees,
        Err(e) => {
            eprintln!("fairgate: {e}");
            return 1;
        }
    };
    info!(count = attendees.len(), roster = %roster_path.display(), "roster loaded");

    let encoder = match &config.credential.signing_key {
        Some(key) => CredentialEncoder::with_signing_key(key.as_bytes().to_vec()),
        None => CredentialEncoder::new(),
    };
    let dispatcher = BatchDispatcher::new(
        channel as Arc<dyn OutboundChannel>,
        encoder,
        Duration::from_secs(config.dispatch.send_timeout_secs),
    );

    let report = match dispatcher.dispatch(&attendees, context, template).await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("fairgate: dispatch aborted: {e}");
            return 1;
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("fairgate: cannot render report: {e}");
                return 1;
            }
        }
    } else {
        for outcome in report.outcomes() {
            match &outcome.status {
                DeliveryStatus::Sent { .. } => println!("sent    {}", outcome.attendee),
                DeliveryStatus::Failed { error } => {
                    println!("failed  {}  ({error})", outcome.attendee)
                }
            }
        }
        println!(
            "{} sent, {} failed of {}",
            report.sent_count(),
            report.failed_count(),
            report.len()
        );
    }

    if report.failed_count() > 0 { 2 } else { 0 }
}

async fn run_doctor(channel: Arc<SmtpChannel>) -> i32 {
    match channel.health_check().await {
        Ok(HealthStatus::Healthy) => {
            println!("outbound channel: ready");
            0
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            println!("outbound channel: unavailable ({reason})");
            1
        }
        Err(e) => {
            println!("outbound channel: probe failed ({e})");
            1
        }
    }
}
