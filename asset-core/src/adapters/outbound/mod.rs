pub mod http;
mod state_file;
mod system;

pub use state_file::FileStateStore;
pub use system::{FixedLocator, SystemClock};
