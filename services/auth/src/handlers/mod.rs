pub mod account;
pub mod health;
pub mod otp;
#[cfg(feature = "legacy-link-reset")]
pub mod recovery_link;
pub mod session;
