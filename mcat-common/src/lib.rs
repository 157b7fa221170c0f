//! # mcat common library
//!
//! Shared code for the mcat catalogue service:
//! - Domain models (formats, streams, tracks, releases, artists)
//! - Database schema creation and format seeding
//! - Configuration loading
//! - Common error type

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
