//! Shared utility functions.
//!
//! - `html`: escaping for the hand-built page fragments
//! - `format`: human-readable sizes and dates for document tables
//! - `filename`: neutralizing user-supplied names before they become blob keys

mod filename;
mod format;
mod html;

pub use filename::{content_disposition, sanitize_segment};
pub use format::{format_date, format_size};
pub use html::{html_escape, notice_query};
