mod entropy_crop;
mod fit;

pub use entropy_crop::EntropyCrop;
pub use fit::{blur_fill, contain, cover, select_filter, BLUR_SIGMA};
