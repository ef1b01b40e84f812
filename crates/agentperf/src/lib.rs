#![forbid(unsafe_code)]

pub mod aggregate;
pub mod cache;
pub mod cli;
pub mod config;
pub mod models;
pub mod period;
pub mod sqlite;
pub mod summary;
pub mod utils;

pub use cli::app::{Cli, Command};
