pub mod analyze;
pub mod chat;
pub mod config;
pub mod interview;
pub mod memories;
pub mod profiles;
