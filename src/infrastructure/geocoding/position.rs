use crate::application::ports::PositionSource;
use crate::domain::value_objects::Coordinates;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Position supplied up front, e.g. from command line flags.
pub struct StaticPositionSource {
    position: Option<Coordinates>,
}

impl StaticPositionSource {
    pub fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl PositionSource for StaticPositionSource {
    async fn current_position(&self) -> Result<Coordinates, AppError> {
        self.position
            .ok_or_else(|| AppError::NotFound("No position available".to_string()))
    }
}
