pub mod cli;
pub mod config;
pub mod infrastructure;
pub mod notification;
