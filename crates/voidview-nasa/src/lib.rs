//! Client for NASA's public imagery APIs.
//!
//! Wraps the Images API (`/search`, `/asset/{id}`) and the APOD API behind a
//! single `NasaClient` with per-attempt timeouts and linear-backoff retries,
//! and provides the filename heuristics used to choose among asset variants.

pub mod apod;
pub mod assets;
pub mod client;
pub mod error;
pub mod models;
pub mod retry;

pub use apod::{ApodFailure, ApodOutcome};
pub use assets::AssetPick;
pub use client::NasaClient;
pub use error::NasaError;
pub use retry::RetryPolicy;
