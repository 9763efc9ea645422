//! Cache entry storage

pub mod memory;
pub mod ports;

pub use memory::MemoryStore;
pub use ports::StoreStrategy;
