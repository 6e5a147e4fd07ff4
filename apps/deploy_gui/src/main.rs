use std::sync::Arc;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use client_core::{load_settings, HttpDeploymentService};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::DeployApp;

#[derive(Parser, Debug)]
struct Args {
    /// Deployment service endpoint; overrides deploy_client.toml and the environment.
    #[arg(long)]
    endpoint: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let settings = load_settings().with_endpoint(args.endpoint);
    let service = HttpDeploymentService::from_settings(&settings)?;
    tracing::info!(endpoint = service.endpoint(), "deployment service configured");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(Arc::new(service), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Zenith")
            .with_inner_size([1100.0, 680.0])
            .with_min_inner_size([760.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Zenith",
        options,
        Box::new(|_cc| Ok(Box::new(DeployApp::new(cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("deploy window failed: {err}"))
}
