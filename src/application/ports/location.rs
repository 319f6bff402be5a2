use crate::domain::value_objects::Coordinates;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Device position provider.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, AppError>;
}

#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Human readable address for a position, `None` when the service knows none.
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<String>, AppError>;
}
