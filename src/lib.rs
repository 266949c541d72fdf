//! leotax - client document portal for Leo Tax Filing.
//!
//! Core library exposing the record store, blob store, services and the
//! web/CLI front-ends.

// Model types use `from_str` methods that return Option<Self>,
// not Result<Self, Error> as std::str::FromStr requires.
#![allow(clippy::should_implement_trait)]

pub mod cli;
pub mod config;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;
