pub mod backend;
pub mod db;
pub mod mailer;
