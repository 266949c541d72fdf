//! HTTP request handlers for the web server.

pub mod admin;
pub mod api;
pub mod auth;
mod helpers;
pub mod pages;
pub mod portal;
mod static_files;

pub use static_files::{serve_css, serve_js};
