#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use args::Args;
use clap::Parser;
use glossa_config::Config;
use glossa_llm::{ChatRequest, Credentials, Overrides, Provider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;
    let _telemetry_guard = glossa_telemetry::init(config.telemetry.as_ref(), &args.log_filter)?;

    let request = read_request(args.request_path())?;
    let (name, provider_config) = config.select_provider(args.provider.as_deref())?;
    let provider = glossa_llm::provider::from_config(provider_config)?;

    let overrides = Overrides {
        model: args.model.clone(),
        temperature: args.temperature,
    };

    tracing::info!(
        config_path = %args.config.display(),
        provider = %name,
        messages = request.messages.len(),
        dry_run = args.dry_run,
        "running request"
    );

    if args.dry_run {
        let prepared = provider.prepare(&request, &overrides)?;
        let body: serde_json::Value = serde_json::from_slice(&prepared.body)?;
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let credentials = Credentials::from(provider_config);

    let response = tokio::select! {
        response = provider.run(&credentials, &request, &overrides) => response?,
        _ = tokio::signal::ctrl_c() => anyhow::bail!("interrupted"),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Read a canonical request from a file, or stdin when no path is given
fn read_request(path: Option<&Path>) -> anyhow::Result<ChatRequest> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read request from stdin")?;
            raw
        }
    };

    serde_json::from_str(&raw).context("request is not a valid chat-completion request")
}
