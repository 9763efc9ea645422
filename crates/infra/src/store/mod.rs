//! Store strategies with I/O

pub mod file;

pub use file::FileStore;
