mod score_func;
mod smooth_saturation;

pub use score_func::{composite_score, score_func};
pub use smooth_saturation::{smooth_saturation, DEFAULT_ALPHA};
