use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::Coordinates,
    ports::outbound::{Clock, Locator},
    LocationError,
};
use crate::time_utils;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> OffsetDateTime {
        time_utils::now_local()
    }
}

/// Locator for devices without GPS: reports a configured position, or fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator {
    position: Option<Coordinates>,
}

impl FixedLocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.position.ok_or_else(|| {
            LocationError::new("no position configured; pass --lat/--lng or set latitude/longitude")
        })
    }
}
