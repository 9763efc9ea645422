//! Infrastructure error conversions

pub mod conversions;

pub use conversions::{classify_status, classify_transport, InfraError};
