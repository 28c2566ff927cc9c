pub mod classifier;
pub mod filter_store;
pub mod operators;
pub mod serializer;
pub mod session;
