use async_trait::async_trait;

use crate::domain::{models::Coordinates, LocationError};

/// Device geolocation provider.
#[async_trait]
pub trait Locator: Send + Sync + 'static {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}
