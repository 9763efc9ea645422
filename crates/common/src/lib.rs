//! Modular common utilities shared across secretcache crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors, backoff, clocks, client identity
//! - `runtime`: async infrastructure (keyed locks) and the at-rest envelope
//! - `observability`: optional tracing (pulled in by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod identity;
#[cfg(feature = "foundation")]
pub mod resilience;
#[cfg(feature = "foundation")]
pub mod time;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod crypto;
#[cfg(feature = "runtime")]
pub mod sync;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use crypto::CbcEnvelope;
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult};
#[cfg(feature = "foundation")]
pub use identity::{user_agent_registry, UserAgentRegistry};
#[cfg(feature = "foundation")]
pub use resilience::{BackoffStrategy, ExponentialBackoff};
#[cfg(feature = "runtime")]
pub use sync::KeyedLocks;
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
