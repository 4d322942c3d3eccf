//! sea-orm entities owned by the compost service.
//!
//! Enumerated columns (`role`, `kind`, `moisture`, `status`, `urgency`,
//! `health_status`) hold the snake_case names from `compost-domain`.

pub mod bin_logs;
pub mod bin_members;
pub mod bins;
pub mod forum_posts;
pub mod forum_replies;
pub mod profiles;
pub mod tasks;
pub mod tips;
