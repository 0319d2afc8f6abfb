pub mod apod;
pub mod asset;
pub mod featured;
pub mod feed;
pub mod health;
pub mod image;
pub mod presets;
pub mod print;
pub mod print_meta;
pub mod render;
pub mod site;
pub mod wallpaper;
