//! Per-image arithmetic: reconstruction against the reference frame and
//! rescaling for display. Everything here is pure.

mod normalize;
mod reconstruct;

pub use normalize::{is_degenerate, max_abs, normalize, normalize_u16};
pub use reconstruct::{reconstruct, widen};
