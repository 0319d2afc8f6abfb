//! VoidView API Library
//!
//! HTTP handlers, routing and application setup for the VoidView service.

mod api_doc;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
