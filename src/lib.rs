//! ShareIt item sharing service
//!
//! Users list items they are willing to lend, others book them for a time
//! range subject to the owner's approval, post requests for items nobody
//! lists yet, and leave comments once a booking is over. The server tier
//! owns the business rules; the gateway tier validates input and forwards.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
