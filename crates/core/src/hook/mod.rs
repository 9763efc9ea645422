//! Cache hooks

pub mod default;
pub mod ports;

pub use default::DefaultCacheHook;
pub use ports::CacheHook;
