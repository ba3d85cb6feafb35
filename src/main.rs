mod app;
mod config;
mod content;
mod discovery;
mod error;
mod gallery;
mod image_loader;
mod lightbox;
mod models;
mod particles;
mod reveal;
mod ui;

use app::ShowcaseApp;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("showcase=info")),
        )
        .init();

    let app = match ShowcaseApp::new() {
        Ok(app) => app,
        Err(err) => {
            tracing::error!(error = ?err, "Failed to start showcase");
            std::process::exit(1);
        }
    };
    std::process::exit(app.run());
}
