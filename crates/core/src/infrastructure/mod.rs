// Infrastructure - adapters that live inside the core crate

pub mod memory;

pub use memory::InMemoryJobStore;
