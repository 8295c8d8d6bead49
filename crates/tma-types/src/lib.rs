//! TMA Types - Shared domain types
//!
//! This crate contains domain types shared by the auth core and its transports:
//! - Verified platform identity
//! - Session contents carried inside the opaque session token

pub mod session;
pub mod user;

pub use session::*;
pub use user::*;
