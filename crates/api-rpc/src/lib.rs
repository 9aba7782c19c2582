//! JSON-RPC API Layer
//!
//! Exposes submission, status and stats over JSON-RPC 2.0.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::RpcServer;
pub use jsonrpsee::server::ServerHandle;
