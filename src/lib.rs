pub mod callback;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod keyboard;
pub mod runner;
pub mod schema;
pub mod scoring;
pub mod state;
pub mod storage;

#[cfg(test)]
mod testing;

pub use runner::QuizEngine;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;
