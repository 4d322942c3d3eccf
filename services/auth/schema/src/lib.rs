//! sea-orm entities owned by the auth service.

pub mod password_reset_otps;
pub mod password_reset_tokens;
