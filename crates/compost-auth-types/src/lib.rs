//! Auth types shared across CompostKaki services.
//!
//! Provides validation of backend-issued access tokens and the `Identity`
//! extractor for `Authorization: Bearer` requests.

pub mod identity;
pub mod token;
