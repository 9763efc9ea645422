//! HTTP transport to the secret service

pub mod client;
pub mod factory;
pub mod signer;
pub mod wire;

pub use client::{endpoint_url, HttpRegionClient};
pub use factory::VariantClientFactory;
pub use signer::{RequestSigner, SignerProvider, StaticHeaderSigner};
