pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod store;
