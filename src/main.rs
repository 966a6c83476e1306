use std::sync::Arc;

use tracing::error;
use usersync::config::{load_config, print_schema};
use usersync::startup;
use usersync::utils::init_logging;

#[tokio::main]
async fn main() {
    if std::env::args().skip(1).any(|arg| arg == "--schema") {
        print_schema();
        return;
    }

    let config = Arc::new(load_config());
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = startup::run(config).await {
        error!("usersync stopped: {}", e);
        std::process::exit(1);
    }
}
