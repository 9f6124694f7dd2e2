pub mod client;
pub mod clipboard;
pub mod config;
pub mod console;
pub mod error;
pub mod health;
pub mod models;
pub mod sink;
