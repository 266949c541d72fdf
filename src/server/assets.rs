//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the web interface.
pub const CSS: &str = include_str!("styles.css");

/// JavaScript for upload forms, delete confirmations and notices.
pub const JS: &str = include_str!("scripts.js");
