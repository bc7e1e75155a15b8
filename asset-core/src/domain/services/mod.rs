mod attendance;
mod auth;
mod rating;

pub use attendance::*;
pub use auth::*;
pub use rating::*;
