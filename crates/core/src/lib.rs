// Batchpace Core - Domain, Ports & Scheduling Engine
// NO transport or HTTP dependencies (adapters live in sibling crates)

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
