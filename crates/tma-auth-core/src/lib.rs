//! TMA Auth Core - Mini App authentication primitives
//!
//! Verifies platform-signed init data and converts a verified identity into
//! a short-lived encrypted session token.
//!
//! ```ignore
//! use tma_auth_core::{AuthConfig, AuthService};
//!
//! let service = AuthService::new(AuthConfig::new(bot_token)?);
//! let auth = service.authenticate(&init_data, unix_now())?;
//! let identity = service.validate_session(auth.session.token.as_str(), unix_now())?;
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod init_data;
pub mod service;
pub mod session;
pub mod verifier;

pub use config::*;
pub use crypto::{constant_time_eq, constant_time_str_eq, HmacKey, SessionKey};
pub use error::*;
pub use init_data::InitData;
pub use service::*;
pub use session::*;
pub use verifier::*;
