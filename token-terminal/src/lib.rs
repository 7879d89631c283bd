pub mod app;
pub mod config;
pub mod network;
pub mod ui;
