pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod middleware;
pub mod resolver;
pub mod server;
pub mod source;
