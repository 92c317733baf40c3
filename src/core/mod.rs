pub mod config;
pub mod enricher;
pub mod error;
pub mod models;
pub mod session;
