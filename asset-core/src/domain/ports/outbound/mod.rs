mod attendance;
mod auth;
mod clock;
mod connectivity;
mod location;
mod rating;
mod state_store;

pub use attendance::*;
pub use auth::*;
pub use clock::*;
pub use connectivity::*;
pub use location::*;
pub use rating::*;
pub use state_store::*;
