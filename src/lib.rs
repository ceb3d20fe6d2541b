//! # Remusys BIR
//!
//! Arena-backed decompiler BIR with an ordered, cycle-safe traversal and a
//! worker pool for visiting independent roots in parallel.

pub mod base;
pub mod ir;
pub mod opt;
pub mod testing;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
