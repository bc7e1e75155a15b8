use crate::domain::{models::AppState, StoreError};

/// On-device persistence for the application state.
pub trait StateStore: Send + Sync + 'static {
    /// Load the saved state, or the default state when nothing was saved yet.
    fn load(&self) -> Result<AppState, StoreError>;

    fn save(&self, state: &AppState) -> Result<(), StoreError>;
}
