pub mod cli;
pub mod config;
pub mod render;
pub mod schedule;
pub mod server;
pub mod sheet;
