//! Cache client orchestration

pub mod builder;
pub mod client;
mod timers;

pub use builder::CacheClientBuilder;
pub use client::CacheClient;
