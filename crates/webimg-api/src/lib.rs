//! Webimg API Library
//!
//! HTTP handlers, error rendering and application setup for the image
//! normalization service.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
pub mod telemetry;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
