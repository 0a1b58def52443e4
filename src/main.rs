use anyhow::{bail, Context};
use apisim::adapters::api_simulator::ApiSimulator;
use apisim::adapters::documentation_handler::DocumentationHandler;
use apisim::cli::{Cli, Command};
use apisim::config::Settings;
use apisim::domain::{HttpMethod, SimulatedResponse, SimulationError};
use clap::Parser;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries JSON output only
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::new_with_cli(&cli)?;
    debug!(?settings, "Loaded configuration");

    let store = settings.build_store();
    let documentation = DocumentationHandler::new(store.clone());

    match cli.command {
        Command::Init { force } => {
            if cli.config.exists() && !force {
                bail!(
                    "{} already exists, pass --force to overwrite it",
                    cli.config.display()
                );
            }
            settings.save_to(&cli.config)?;
            info!("Wrote {}", cli.config.display());
        }
        Command::Generate { sample } => {
            let content = tokio::fs::read_to_string(&sample)
                .await
                .with_context(|| format!("Failed to read {}", sample.display()))?;
            let sample: Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", sample.display()))?;

            let doc = documentation.generate(sample, &settings.api.prefix).await?;
            println!("{}", serde_json::to_string_pretty(&doc.routes)?);
        }
        Command::Routes => {
            let Some(doc) = documentation.load().await? else {
                bail!("No documentation generated yet, run `apisim generate <sample.json>` first");
            };
            for route in &doc.routes {
                println!("{:<6} {}", route.method, route.url);
                println!("       {}", route.method.description());
                println!("       {}", route.description);
            }
        }
        Command::Call {
            method,
            url,
            params,
            body,
        } => {
            let body: Option<Value> = body
                .as_deref()
                .map(serde_json::from_str)
                .transpose()
                .context("--body is not valid JSON")?;

            let response: SimulatedResponse = match documentation.load().await? {
                None => SimulationError::NotInitialized.into(),
                Some(doc) => {
                    let matched = match method.parse::<HttpMethod>() {
                        Ok(m) => doc.routes.match_request(m, &url),
                        Err(_) => doc.routes.match_path(&url),
                    };

                    match matched {
                        None => SimulationError::resource_not_found().into(),
                        Some((route, mut extracted)) => {
                            extracted.extend(params);
                            ApiSimulator::new(store.clone())
                                .request_with_method(&method, route, &extracted, body.as_ref())
                                .await
                        }
                    }
                }
            };

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Data => {
            let Some(data) = documentation.live_data().await? else {
                bail!("No live data, run `apisim generate <sample.json>` first");
            };
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Command::Reset => {
            documentation.clear().await?;
        }
    }

    Ok(())
}
