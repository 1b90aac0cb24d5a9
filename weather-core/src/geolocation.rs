use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::GeolocationError, model::Coordinates};

/// One-shot source of the user's current position.
#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// Locator backed by a position known up front (config or command line).
#[derive(Debug, Clone, Default)]
pub struct FixedLocator {
    position: Option<Coordinates>,
}

impl FixedLocator {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }

    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self::new(Some(Coordinates { latitude, longitude }))
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        self.position.ok_or(GeolocationError::PositionUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configured_position_is_returned() {
        let pos = FixedLocator::at(51.5, -0.12).current_position().await.unwrap();
        assert_eq!(pos.latitude, 51.5);
        assert_eq!(pos.longitude, -0.12);
    }

    #[tokio::test]
    async fn no_position_is_unavailable() {
        let err = FixedLocator::default().current_position().await.unwrap_err();
        assert_eq!(err, GeolocationError::PositionUnavailable);
    }
}
