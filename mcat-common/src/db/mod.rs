//! Catalogue database schema

pub mod init;

pub use init::*;
