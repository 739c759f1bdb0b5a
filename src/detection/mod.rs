//! Pure detectors over byte samples and parsed rows.
//!
//! Nothing here performs I/O; the [`crate::inspector`] façade feeds these with bytes it has
//! already read from the store.

pub mod encoding;
pub mod format;
pub mod header;
pub mod row_count;
pub mod separator;

pub use encoding::decode_sample;
pub use format::{FileFormat, detect_format};
pub use header::has_header;
pub use row_count::estimate_row_count;
pub use separator::detect_separator;
