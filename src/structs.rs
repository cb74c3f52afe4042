pub mod auth;
pub mod chat;
pub mod google;
pub mod sheets;
pub mod templates;
