use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use risk_core::{Config, HttpRiskClient, MemoryView, RiskRequestHandler};
use tracing::info;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "risk", version, about = "Weather risk assessment CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the assessment server.
    Configure,

    /// Request a risk assessment for one location.
    Assess {
        /// Latitude, sent to the server exactly as typed.
        #[arg(allow_hyphen_values = true)]
        latitude: String,

        /// Longitude, sent to the server exactly as typed.
        #[arg(allow_hyphen_values = true)]
        longitude: String,

        /// Server base URL; overrides the config file.
        #[arg(long)]
        server: Option<String>,

        /// Print the resulting view as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for coordinates repeatedly, one assessment per entry.
    Interactive {
        /// Server base URL; overrides the config file.
        #[arg(long)]
        server: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Assess { latitude, longitude, server, json } => {
                let handler = build_handler(server.as_deref())?;
                handler.view().await.set_inputs(latitude, longitude);
                handler.on_request().await;

                let view = handler.into_view();
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&view).context("Failed to serialize view")?
                    );
                } else {
                    print!("{}", output::render(&view));
                }
                Ok(())
            }
            Command::Interactive { server } => interactive(server.as_deref()).await,
        }
    }
}

fn build_handler(server: Option<&str>) -> anyhow::Result<RiskRequestHandler<MemoryView>> {
    let mut config = Config::load()?;
    if let Some(url) = server {
        config.set_server_url(url)?;
    }

    let client = HttpRiskClient::from_config(&config)?;
    info!(endpoint = client.endpoint(), "using risk assessment server");

    Ok(RiskRequestHandler::new(Arc::new(client), MemoryView::new()))
}

async fn interactive(server: Option<&str>) -> anyhow::Result<()> {
    let handler = build_handler(server)?;
    println!("Enter coordinates to assess. Press Esc or Ctrl-C to quit.");

    loop {
        let (prev_lat, prev_lon) = {
            let view = handler.view().await;
            (view.latitude.clone(), view.longitude.clone())
        };

        let Some(latitude) = prompt_field("Latitude:", &prev_lat)? else { break };
        let Some(longitude) = prompt_field("Longitude:", &prev_lon)? else { break };

        print!("{}", run_round(&handler, latitude, longitude).await);
    }

    Ok(())
}

/// One interactive round: fill the inputs, send, and render whatever the view
/// holds afterwards. A transport failure leaves the view as it was and is only
/// logged.
async fn run_round(
    handler: &RiskRequestHandler<MemoryView>,
    latitude: String,
    longitude: String,
) -> String {
    handler.view().await.set_inputs(latitude, longitude);
    handler.on_request().await;

    let view = handler.view().await;
    output::render(&*view)
}

/// `None` once the user cancels the prompt.
fn prompt_field(message: &str, previous: &str) -> anyhow::Result<Option<String>> {
    let mut prompt = Text::new(message);
    if !previous.is_empty() {
        prompt = prompt.with_default(previous);
    }

    match prompt.prompt() {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("Failed to read input"),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let url = Text::new("Risk assessment server URL:")
        .with_default(config.server_url())
        .prompt()
        .context("Failed to read server URL")?;
    config.set_server_url(&url)?;

    let current_timeout = config.timeout_secs.map(|t| t.to_string()).unwrap_or_default();
    let timeout = Text::new("Request timeout in seconds (empty for none):")
        .with_initial_value(&current_timeout)
        .prompt()
        .context("Failed to read timeout")?;

    config.timeout_secs = match timeout.trim() {
        "" => None,
        t => Some(t.parse().with_context(|| format!("Invalid timeout '{t}'"))?),
    };

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
