//! Entry point: loads configuration, starts the directory and hands the terminal to
//! the console until the user quits.

use tokio::io::BufReader;
use tracing::{error, info};
use user_directory::config::DirectoryConfig;
use user_directory::lifecycle::{setup_tracing, DirectorySystem};
use user_directory::notify::ToastQueue;
use user_directory::ui::Console;

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = DirectoryConfig::load().map_err(|e| e.to_string())?;
    setup_tracing();

    info!(base_url = %config.base_url, page_size = config.page_size, "Starting user directory");

    let mut system = DirectorySystem::new(&config).map_err(|e| e.to_string())?;

    // Initial page; a failure here is shown in the console's error banner.
    if let Err(e) = system.client.load_page(1).await {
        error!(error = %e, "Initial load failed");
    }

    let mut console = Console::new(
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        system.client.clone(),
        &mut system.notifications,
        ToastQueue::new(config.toast_ttl()),
    );
    let outcome = console.run().await;
    drop(console);

    if let Err(e) = &outcome {
        error!(error = %e, "Console failed");
    }
    system.shutdown().await.map_err(|e| e.to_string())?;
    outcome.map_err(|e| e.to_string())
}
