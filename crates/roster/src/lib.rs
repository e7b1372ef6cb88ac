#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod display;
pub mod ingest;
pub mod models;
pub mod parse;
pub mod sqlite;

pub use cli::app::{Cli, Command};
pub use models::Record;
