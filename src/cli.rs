//! Command line interface
//!
//! - `ask`: classify a query and run the requested agents
//! - `weather` / `places`: run one agent directly
//! - `serve`: start the JSON HTTP API

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use tourism_planner::models::{PlacesResult, ResponseEnvelope, WeatherResult};
use tourism_planner::{AgentResult, Orchestrator, PlannerConfig, telemetry, web};

/// Places shown in text output
const TEXT_PLACES_SHOWN: usize = 10;

/// Multi-agent tourism planner
#[derive(Parser, Debug)]
#[command(name = "tourism-planner")]
#[command(about = "Answers travel questions with current weather and nearby attractions")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a free-text travel question
    Ask {
        /// e.g. "weather in Paris" or "attractions in Tokyo"
        query: String,
    },
    /// Current weather for a place
    Weather { place: String },
    /// Points of interest near a place
    Places {
        place: String,
        /// Search radius in meters
        #[arg(long)]
        radius: Option<u32>,
    },
    /// Start the HTTP API
    Serve {
        /// Overrides server.port
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = PlannerConfig::load_from_path(cli.config.clone())?;
    telemetry::init(&config.logging, cli.verbose)?;

    let orchestrator = Orchestrator::from_config(&config)?;

    match cli.command {
        Commands::Ask { query } => {
            let envelope = orchestrator.handle(&query).await;
            emit(cli.json, &envelope, render_envelope)
        }
        Commands::Weather { place } => {
            let result = orchestrator
                .weather_agent()
                .handle(&place.to_lowercase())
                .await;
            emit(cli.json, &result, render_weather)
        }
        Commands::Places { place, radius } => {
            let agent = orchestrator.places_agent();
            let radius = radius.unwrap_or_else(|| agent.default_radius());
            let result = agent.handle(&place.to_lowercase(), radius).await;
            emit(cli.json, &result, render_places)
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            info!("Starting tourism planner v{}", tourism_planner::VERSION);
            web::run(
                config.server.port,
                Arc::new(orchestrator),
                config.server.request_timeout(),
            )
            .await?;
            Ok(())
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, render: fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", render(value));
    }
    Ok(())
}

fn render_envelope(envelope: &ResponseEnvelope) -> String {
    let mut sections = Vec::new();
    if let Some(weather) = &envelope.weather {
        sections.push(render_weather(weather));
    }
    if let Some(places) = &envelope.places {
        sections.push(render_places(places));
    }
    if sections.is_empty() {
        return format!("Nothing to report for '{}'.", envelope.original_query);
    }
    sections.join("\n\n")
}

fn render_weather(result: &WeatherResult) -> String {
    match result {
        AgentResult::Failed { error } => error.user_message().to_string(),
        AgentResult::Found { location, payload } => {
            let mut text = format!(
                "Weather in {} ({})\n  Temperature: {}\n  Wind: {}",
                location.display_name,
                location.format_coordinates(),
                payload.format_temperature(),
                payload.format_wind()
            );
            if let Some(description) = payload.description() {
                text.push_str(&format!("\n  Conditions: {description}"));
            }
            text.push_str(&format!(
                "\n  Observed: {}",
                payload.observed_at.format("%Y-%m-%d %H:%M UTC")
            ));
            text
        }
    }
}

fn render_places(result: &PlacesResult) -> String {
    match result {
        AgentResult::Failed { error } => error.user_message().to_string(),
        AgentResult::Found { location, payload } if payload.is_empty() => {
            format!("No named places found near {}.", location.display_name)
        }
        AgentResult::Found { location, payload } => {
            let mut lines = vec![format!(
                "Places near {} ({} found)",
                location.display_name,
                payload.len()
            )];
            for (rank, place) in payload.iter().take(TEXT_PLACES_SHOWN).enumerate() {
                let category = place
                    .category()
                    .map(|c| format!(" [{c}]"))
                    .unwrap_or_default();
                lines.push(format!(
                    "  {:>2}. {}{} - {}",
                    rank + 1,
                    place.name,
                    category,
                    place.format_distance()
                ));
            }
            lines.join("\n")
        }
    }
}
