//! Domain types and models

pub mod credential;
pub mod region;
pub mod request;
pub mod secret;

pub use credential::Credential;
pub use region::{KmsVariant, RankedRegionTarget, RegionTarget};
pub use request::GetSecretValueRequest;
pub use secret::{CacheEntry, SecretDataType, SecretInfo};
