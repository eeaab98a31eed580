pub mod config;
pub mod console;
pub mod data;
pub mod search;
pub mod state;
pub mod utils;
