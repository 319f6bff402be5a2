use crate::application::ports::{PositionSource, ReverseGeocoder};
use crate::domain::value_objects::Coordinates;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocationResolution {
    Address {
        coordinates: Coordinates,
        address: String,
    },
    /// Position known but no address; the coordinates label is the location text.
    Coordinates {
        coordinates: Coordinates,
        label: String,
    },
    /// The user has to type the location.
    ManualEntryRequired { reason: String },
}

impl LocationResolution {
    pub fn location_text(&self) -> Option<&str> {
        match self {
            LocationResolution::Address { address, .. } => Some(address),
            LocationResolution::Coordinates { label, .. } => Some(label),
            LocationResolution::ManualEntryRequired { .. } => None,
        }
    }
}

/// Fills the location field of a draft from the device position.
pub struct LocationService {
    positions: Arc<dyn PositionSource>,
    geocoder: Option<Arc<dyn ReverseGeocoder>>,
    acquisition_timeout: Duration,
}

impl LocationService {
    pub fn new(
        positions: Arc<dyn PositionSource>,
        geocoder: Option<Arc<dyn ReverseGeocoder>>,
        acquisition_timeout: Duration,
    ) -> Self {
        Self {
            positions,
            geocoder,
            acquisition_timeout,
        }
    }

    pub async fn resolve(&self) -> LocationResolution {
        let coordinates =
            match tokio::time::timeout(self.acquisition_timeout, self.positions.current_position())
                .await
            {
                Ok(Ok(coordinates)) => coordinates,
                Ok(Err(err)) => {
                    tracing::info!(error = %err, "position unavailable");
                    return LocationResolution::ManualEntryRequired {
                        reason: err.to_string(),
                    };
                }
                Err(_) => {
                    tracing::info!(
                        timeout_secs = self.acquisition_timeout.as_secs(),
                        "position acquisition timed out"
                    );
                    return LocationResolution::ManualEntryRequired {
                        reason: "Position acquisition timed out".to_string(),
                    };
                }
            };

        let label = coordinates.label();
        let Some(geocoder) = &self.geocoder else {
            return LocationResolution::Coordinates { coordinates, label };
        };

        match geocoder.reverse(coordinates).await {
            Ok(Some(address)) => LocationResolution::Address {
                coordinates,
                address,
            },
            Ok(None) => LocationResolution::Coordinates { coordinates, label },
            Err(err) => {
                tracing::warn!(error = %err, "reverse geocoding failed");
                LocationResolution::Coordinates { coordinates, label }
            }
        }
    }
}
