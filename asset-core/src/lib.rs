pub mod adapters;
pub mod config;
pub mod domain;
pub mod time_utils;

pub use config::AppConfig;
