mod attendance;
mod ids;
mod rating;
mod session;
mod state;

pub use attendance::*;
pub use ids::*;
pub use rating::*;
pub use session::*;
pub use state::*;
