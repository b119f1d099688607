#![allow(dead_code)]

pub mod error;
pub mod persistence;
pub mod store;
pub mod types;

pub use error::MemoryError;
pub use persistence::MemoryPersistence;
pub use store::MemoryStore;
pub use types::MemoryItem;
