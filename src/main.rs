use dotenv::dotenv;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use news_notifier::config::Config;
use news_notifier::routes;
use news_notifier::scheduler;
use news_notifier::services::notifier::NewsNotifier;

#[tokio::main]
async fn main() {
    dotenv().ok();
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let notifier = match NewsNotifier::from_config(&config) {
        Ok(notifier) => Arc::new(notifier),
        Err(e) => {
            error!("Failed to set up notifier: {:#}", e);
            std::process::exit(1);
        }
    };

    // Held for the lifetime of the server.
    let _scheduler = match &config.schedule {
        Some(schedule) => match scheduler::start(notifier.clone(), schedule).await {
            Ok(scheduler) => Some(scheduler),
            Err(e) => {
                error!("Failed to start scheduler: {:#}", e);
                std::process::exit(1);
            }
        },
        None => {
            info!("NOTIFY_SCHEDULE not set, relying on external triggers");
            None
        }
    };

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    let api = routes::routes(notifier).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
