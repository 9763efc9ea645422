//! Refresh scheduling policy

pub mod default;
pub mod ports;

pub use default::DefaultRefreshStrategy;
pub use ports::RefreshStrategy;
