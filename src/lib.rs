#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the bridgrs library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod broker;
pub mod settings;
pub mod store;
pub mod utils;
pub mod webauthn;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use broker::{CredentialProvider, PasskeyBroker};
pub use settings::BridgrsSettings;
pub use store::{CredentialRecord, CredentialStore, CredentialUpdate, MemoryStore, SessionRecord};
pub use webauthn::{CredentialError, DomErrorName, ProviderFailure};
