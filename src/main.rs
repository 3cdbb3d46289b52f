use dotenv::dotenv;
use neonsign_backend::app::app::App;
use neonsign_backend::util::logger::Logger;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    // Load environment variables before the logger reads its filter vars
    let dotenv_result = dotenv();

    // Guards must stay alive for the lifetime of the process
    let _logger = Logger::new().expect("Failed to initialize logging");

    match dotenv_result {
        Ok(_) => info!("Loaded .env file"),
        Err(e) => warn!("No .env file loaded: {} (using system env vars)", e),
    }

    info!("Starting neon sign quote backend");

    let app = App::new().await;
    app.start().await;
}
