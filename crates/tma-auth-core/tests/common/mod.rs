//! Common test utilities for tma-auth-core integration tests

pub mod init_data_signer;

#[allow(unused_imports)]
pub use init_data_signer::{sign_init_data, PlatformSigner};
