//! Data models for the application
//!
//! Every shape here is transient: built from a NASA response or a request and
//! serialized straight back out. Nothing is persisted.

mod apod;
mod category;
mod gallery;
mod print;
mod render;

pub use apod::*;
pub use category::*;
pub use gallery::*;
pub use print::*;
pub use render::*;
