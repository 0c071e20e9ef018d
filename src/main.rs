//! Entry point for the headless site driver.

use std::process::ExitCode;

use bilingual_site::Site;
use bilingual_site::config::ConfigManager;
use bilingual_site::shell;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config_manager = ConfigManager::new();
    let site_root = std::env::current_dir().ok();
    if let Err(e) = config_manager.load_settings(site_root) {
        tracing::error!("Failed to load settings: {e}");
        return ExitCode::FAILURE;
    }

    let mut site = match Site::load(&config_manager) {
        Ok(site) => site,
        Err(e) => {
            tracing::error!("Failed to start site: {e}");
            return ExitCode::FAILURE;
        }
    };

    let (stdin, stdout) = (BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    if let Err(e) = shell::run(&mut site, stdin, stdout).await {
        tracing::error!("Driver stopped: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
