//! Test Helper Utilities
//!
//! Shared utilities for testing mcat-server

#![allow(dead_code)]

#[path = "../../src/test_support/fixtures.rs"]
pub mod audio_fixtures;
pub mod db_utils;

pub use audio_fixtures::{
    flac_with_comments, ogg_vorbis_with_comments, tagged_wav, zip_archive, FixtureTags,
};
pub use db_utils::{create_test_app, create_test_collection, TestApp};
