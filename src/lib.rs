pub mod api;
pub mod core;
pub mod infra;
pub mod models;
