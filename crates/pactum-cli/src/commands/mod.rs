//! Command implementations.

pub mod config;
pub mod document;

pub use self::config::execute_config;
pub use self::document::{execute_chunk, execute_parse, execute_process};
