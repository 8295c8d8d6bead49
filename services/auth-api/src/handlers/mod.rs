//! HTTP handlers

mod auth;
mod health;

pub use auth::{login, protected, session};
pub use health::{health, ready};
