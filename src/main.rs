use std::sync::Arc;

use dotenvy::dotenv;
use teloxide::error_handlers::IgnoringErrorHandlerSafe;
use teloxide::prelude::*;
use teloxide::update_listeners::webhooks::{self, Options};
use tgquizbot::config::Config;
use tgquizbot::gateway::TelegramGateway;
use tgquizbot::schema::schema;
use tgquizbot::storage::QuestionBank;
use tgquizbot::QuizEngine;
use tracing::{level_filters::LevelFilter, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = Config::from_env();
    let log_level = config.as_ref().map(|c| c.log_level).unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::from_level(log_level))
        .json()
        .with_span_events(FmtSpan::ENTER)
        .log_internal_errors(true)
        .with_line_number(true)
        .with_target(false)
        .init();

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let bot = Bot::new(config.token.clone());
    let gateway = Arc::new(TelegramGateway::new(bot.clone()));
    let engine = Arc::new(QuizEngine::new(
        QuestionBank::default(),
        gateway,
        config.question_delay,
    ));
    tracing::info!(
        questions = engine.bank().len(),
        delay_secs = config.question_delay.as_secs(),
        "Starting bot..."
    );

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema())
        .dependencies(dptree::deps![engine])
        .enable_ctrlc_handler()
        .build();

    match config.webhook {
        Some(webhook) => {
            tracing::info!(url = %webhook.url, addr = %webhook.addr, "using webhook listener");
            let listener = match webhooks::axum(bot, Options::new(webhook.addr, webhook.url)).await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!(error = %e, "failed to build a webhook listener");
                    std::process::exit(1);
                }
            };
            dispatcher
                .dispatch_with_listener(listener, Arc::new(IgnoringErrorHandlerSafe))
                .await
        }
        None => dispatcher.dispatch().await,
    }
}
