use std::process::ExitCode;

use homework_core::{
    spawn_poller, Credentials, HomeworkPoller, PollConfig, PollCursor, PracticumClient,
    TelegramNotifier,
};
use reqwest::ClientBuilder;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "missing required configuration, not starting");
            return ExitCode::FAILURE;
        }
    };
    let config = PollConfig::load();

    let client = match ClientBuilder::new()
        .user_agent("homework-bot/0.1")
        .timeout(config.request_timeout())
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let source = PracticumClient::new(
        client.clone(),
        config.endpoint.clone(),
        credentials.practicum_token.clone(),
    );
    let notifier = TelegramNotifier::new(
        client,
        config.telegram_api_url.clone(),
        credentials.telegram_token.clone(),
        credentials.telegram_chat_id.clone(),
    );
    let cursor = PollCursor::new(config.initial_cursor.timestamp());
    let poller = spawn_poller(
        HomeworkPoller::new(source, notifier, cursor),
        config.retry_period(),
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the bot keeps polling until it is killed.
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
    if let Err(e) = poller.stop().await {
        error!(error = %e, "poller task failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
