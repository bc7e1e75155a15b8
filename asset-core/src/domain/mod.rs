mod aggregator;
mod error;
pub mod models;
pub mod ports;
mod role;
pub mod services;

#[cfg(test)]
pub(crate) mod mock;

pub use aggregator::*;
pub use error::*;
pub use role::*;
