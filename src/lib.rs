pub mod cli;
pub mod config;
pub mod display;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod utils;
