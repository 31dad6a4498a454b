//! Web layer for the trip ranker.
//!
//! Provides HTTP endpoints for planning trips and ranking supplied plans.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
