//! Retry pacing primitives.

pub mod backoff;

pub use backoff::{BackoffStrategy, ExponentialBackoff};
