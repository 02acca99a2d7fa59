// Vakio Agent - library root for testing

pub mod auth;
pub mod config;
pub mod error;
pub mod signal;
pub mod source;
pub mod supervisor;
