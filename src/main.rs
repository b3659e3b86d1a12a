use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, error};

use finguard_kyc::{
    api::types::{AmlCheckRequest, DocumentCheckRequest},
    core::{
        identity::types::{DocumentType, ImageBlob},
        services::verification::SubmissionOutcome,
    },
    presentation::ConsolePresenter,
    utils::{config::Config, logging},
    Application,
};

#[derive(Parser)]
#[command(name = "finguard", version, about = "FinGuard KYC/AML client")]
struct Cli {
    /// Extra configuration file layered over config/default and config/local
    #[arg(short, long, env = "FINGUARD_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the document + selfie verification flow
    Verify {
        #[arg(long)]
        document: PathBuf,
        #[arg(long, default_value = "auto")]
        document_type: String,
        #[arg(long)]
        selfie: PathBuf,
    },
    /// Show dashboard statistics
    Stats,
    /// List recent transactions
    Transactions {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List recent alerts
    Alerts {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Submit a transaction for AML screening
    AmlCheck {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        recipient: String,
        #[arg(long, default_value = "transfer")]
        transaction_type: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Check the format of a PAN or Aadhaar number
    CheckDocument {
        #[arg(long)]
        document_type: String,
        #[arg(long)]
        document_number: String,
        #[arg(long, default_value = "")]
        full_name: String,
    },
    /// Generate a compliance report on the backend
    Report,
    /// Show the audit trail
    Audit {
        #[arg(long)]
        event_type: Option<String>,
    },
    /// Ask the compliance assistant a question
    Chat { message: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::from_file(path),
        None => Config::new(),
    }
    .context("Failed to load configuration")?;

    let _log_guard = logging::init(&config.logging);
    info!("Starting FinGuard client v{}", env!("CARGO_PKG_VERSION"));

    let app = Application::new(config).map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;

    let result = run(&app, cli.command).await;
    app.shutdown();
    result
}

async fn run(app: &Application, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Verify { document, document_type, selfie } => {
            let document = ImageBlob::from_path(&document)
                .await
                .with_context(|| format!("Failed to read {}", document.display()))?;
            let selfie = ImageBlob::from_path(&selfie)
                .await
                .with_context(|| format!("Failed to read {}", selfie.display()))?;

            let flow = app.verification_flow(Arc::new(ConsolePresenter::stdout()));

            match flow.submit_document(document, DocumentType::new(document_type)).await {
                SubmissionOutcome::Advanced(_) => {}
                outcome => bail!("Document step did not complete: {:?}", outcome),
            }
            match flow.submit_selfie(selfie).await {
                SubmissionOutcome::Advanced(_) => {}
                outcome => bail!("Selfie step did not complete: {:?}", outcome),
            }
        }
        Command::Stats => {
            let stats = app.dashboard().stats().await?;
            println!("Total transactions:   {}", stats.total_transactions);
            println!("Flagged transactions: {} ({:.2}%)", stats.flagged_transactions, stats.flagging_rate);
            println!("Total volume:         {:.2}", stats.total_volume);
            println!("Open alerts:          {}", stats.open_alerts);
            println!("Average risk score:   {:.2}", stats.average_risk_score);
        }
        Command::Transactions { limit } => {
            for txn in app.dashboard().recent_transactions(limit).await? {
                println!(
                    "{:<22} {:<12} {:>14.2} risk {:>5.1}{}",
                    txn.id.as_deref().unwrap_or("-"),
                    txn.user_id.as_deref().unwrap_or("-"),
                    txn.amount,
                    txn.risk_score,
                    if txn.flagged { "  FLAGGED" } else { "" }
                );
            }
        }
        Command::Alerts { limit } => {
            for alert in app.dashboard().recent_alerts(limit).await? {
                println!(
                    "{:<22} {:<10} {:<10} {}",
                    alert.id.as_deref().unwrap_or("-"),
                    alert.severity.as_deref().unwrap_or("-"),
                    alert.status.as_deref().unwrap_or("-"),
                    alert.transaction_id.as_deref().unwrap_or("-"),
                );
            }
        }
        Command::AmlCheck { user_id, amount, recipient, transaction_type, location, description } => {
            let request = AmlCheckRequest {
                transaction_type,
                location,
                description,
                ..AmlCheckRequest::new(user_id, amount, recipient)
            };
            let result = app.dashboard().check_transaction(&request).await?;
            println!("Decision: {:?}", result.decision);
            println!("Combined risk score: {}/100", result.combined_risk_score);
            println!("{}", serde_json::to_string_pretty(&result.rule_analysis)?);
        }
        Command::CheckDocument { document_type, document_number, full_name } => {
            let request = DocumentCheckRequest::new(document_type, document_number, full_name);
            let result = app.dashboard().verify_document(&request).await?;
            let verdict = if result.valid { "VALID" } else { "INVALID" };
            match result.confidence {
                Some(confidence) => println!("{}: {} (confidence {:.0}%)", verdict, result.message, confidence),
                None => println!("{}: {}", verdict, result.message),
            }
        }
        Command::Report => {
            let report = app.dashboard().generate_report().await?;
            println!("Report written to {}", report.report_path);
        }
        Command::Audit { event_type } => {
            let trail = app.dashboard().audit_trail(event_type.as_deref()).await?;
            for entry in &trail.entries {
                println!(
                    "{:<28} {:<24} {}",
                    entry.timestamp.as_deref().unwrap_or("-"),
                    entry.event_type,
                    entry.event_data
                );
            }
            println!("Showing {} of {} entries", trail.entries.len(), trail.total_count);
        }
        Command::Chat { message } => {
            let reply = app.dashboard().chat(&message).await?;
            println!("{}", reply.response);
        }
    }

    Ok(())
}
