use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use client_core::{
    load_settings, HttpDeploymentService, SubmissionController, SubmissionState, SystemClipboard,
};
use serde::Serialize;
use shared::error::ErrorKind;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Deploy a GitHub repository through the deployment service")]
struct Args {
    /// Repository to deploy, e.g. https://github.com/acme/site
    #[arg(default_value = "")]
    repo_url: String,
    /// Deployment service endpoint; overrides deploy_client.toml and the environment.
    #[arg(long)]
    endpoint: Option<String>,
    /// Copy the deployment URL to the clipboard after a successful deploy.
    #[arg(long)]
    copy: bool,
    /// Print the final state as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
enum StateReport<'a> {
    Idle,
    Pending,
    Succeeded {
        repo: &'a str,
        public_url: &'a str,
        build_result: &'a serde_json::Value,
    },
    Failed {
        kind: ErrorKind,
        error: &'a str,
    },
}

impl<'a> From<&'a SubmissionState> for StateReport<'a> {
    fn from(state: &'a SubmissionState) -> Self {
        match state {
            SubmissionState::Idle => Self::Idle,
            SubmissionState::Pending { .. } => Self::Pending,
            SubmissionState::Succeeded(result) => Self::Succeeded {
                repo: &result.repository_id,
                public_url: &result.deployment_url,
                build_result: &result.build_metadata,
            },
            SubmissionState::Failed(error) => Self::Failed {
                kind: error.kind,
                error: &error.message,
            },
        }
    }
}

fn render_text(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => "Nothing submitted".to_string(),
        SubmissionState::Pending { .. } => "Deploying...".to_string(),
        SubmissionState::Succeeded(result) => format!(
            "Deployment Successful\nRepository:     {}\nDeployment URL: {}",
            result.repository_id, result.deployment_url
        ),
        SubmissionState::Failed(error) => format!("Error: {}", error.message),
    }
}

fn exit_status(state: &SubmissionState) -> u8 {
    match state {
        SubmissionState::Succeeded(_) => 0,
        SubmissionState::Failed(error) if error.kind == ErrorKind::Validation => 2,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings().with_endpoint(args.endpoint);
    let service = HttpDeploymentService::from_settings(&settings)?;
    tracing::debug!(endpoint = service.endpoint(), "using deployment service");

    let mut controller = SubmissionController::new();
    controller.submit(&service, args.repo_url).await;
    let state = controller.state();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&StateReport::from(state))?);
    } else {
        println!("{}", render_text(state));
    }

    if args.copy {
        if let Some(result) = state.result() {
            let mut clipboard = SystemClipboard::new();
            if controller.copy(&mut clipboard, &result.deployment_url) {
                eprintln!("Copied deployment URL to clipboard");
            } else {
                eprintln!("Could not copy deployment URL to clipboard");
            }
        }
    }

    Ok(ExitCode::from(exit_status(state)))
}
