//! Raster pipeline: decode NASA source images under size limits, fit them to a
//! target frame, and encode JPEG output.

pub mod compression;
pub mod decode;
pub mod error;
pub mod image;
pub mod metadata;
pub mod render;

pub use error::ProcessingError;
pub use render::{render_print, render_wallpaper, RenderedImage};
