// Frameworks layer: environment configuration and server bootstrap.

pub mod config;
pub mod server;
