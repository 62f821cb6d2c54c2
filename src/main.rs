use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, AppOptions};
use crate::config::{AppConfig, KeyResolver};

mod app;
mod cli;
mod config;
mod export;
mod notice;
mod screen;
mod search;
mod theme;
mod tui;
mod ui;
mod workbook;

pub use theme::Theme;

const APP_NAME: &str = "instrument-selector";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting {}", APP_NAME);

    let args = cli::Args::parse();
    let config = config::load()?;
    let options = resolve_options(&config, &args)?;
    info!("Exports go to {}", options.output_dir.display());

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings)));
    let theme = theme::theme_from_name(&config.theme.name);

    let mut app = App::new(options, resolver, theme);
    if let Some(path) = &args.workbook {
        app.open_workbook(path);
    }
    app.run().await?;

    Ok(())
}

/// Command-line flags win over the config file, which wins over the
/// working directory.
fn resolve_options(config: &AppConfig, args: &cli::Args) -> Result<AppOptions> {
    let cwd = std::env::current_dir()?;
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.export.output_dir.clone())
        .unwrap_or_else(|| cwd.clone());
    Ok(AppOptions {
        start_dir: args.start_dir.clone().unwrap_or(cwd),
        output_dir,
        open_after_export: config.export.open_after_export && !args.no_open,
    })
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || PathBuf::from("logs"),
        |path| path.join(APP_NAME).join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, format!("{APP_NAME}.log"));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
