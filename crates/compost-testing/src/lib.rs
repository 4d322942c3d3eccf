//! Test utilities for CompostKaki services.
//!
//! Provides `MockAuth` for minting bearer credentials accepted by the
//! `Identity` extractor. Use from dev-dependencies only.

pub mod auth;
