// web-server/src/lib.rs
//! Web3 login, privilege token exchange and trip map API.

pub mod api;
pub mod cache;
pub mod clients;
pub mod error;
pub mod geo;
pub mod id_token;
pub mod middleware;
pub mod pipeline;
pub mod resolution;
pub mod state;
pub mod status;
pub mod utils;
pub mod views;

pub use api::configure;
pub use error::{ApiError, Result};
pub use state::AppState;
