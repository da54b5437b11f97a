//! Storage layer (JSON batch files).

pub mod batch_store;

pub use batch_store::BatchStore;
