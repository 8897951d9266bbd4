//! `.dml` frame-sequence decoding.
//!
//! A `.dml` file is a headerless concatenation of 64×96 frames of
//! little-endian signed 16-bit samples (12288 bytes per frame). The valid
//! image region of each frame is rows `2..62` and columns `5..94`; the border
//! is sensor overscan and is discarded by `read_frame`.
//!
//! The total length must be an exact multiple of the frame size, otherwise
//! `frame_count` fails before any frame is decoded. Offsets and shapes live in
//! `layout`, sample access in `reader`.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::DmlError;
pub use layout::{CropWindow, FrameLayout};
pub use parser::{decode_frame, frame_count, read_frame};
