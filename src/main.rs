mod app;
mod charts;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use config::Config;
use data::{loader, prepare};
use state::AppState;

fn main() -> Result<()> {
    let config = Config::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .init();

    // The dataset is loaded and prepared once; a bad file stops startup.
    let raw = loader::load_file(&config.data, config.delimiter)
        .inspect_err(|e| log::error!("Cannot start dashboard: {e}"))
        .with_context(|| format!("loading dataset {}", config.data.display()))?;
    let dataset = prepare::prepare(raw);
    if dataset.is_empty() {
        log::warn!("No games left after preparation; charts will be empty");
    }
    let state = AppState::new(dataset, config.debug);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::panels::DASHBOARD_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running dashboard window: {e}"))
}
