pub mod auth;
pub mod crypto;
pub mod event;
pub mod gallery;
pub mod log;
pub mod user;
