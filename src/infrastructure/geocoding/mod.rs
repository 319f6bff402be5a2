pub mod nominatim;
pub mod position;

pub use nominatim::NominatimGeocoder;
pub use position::StaticPositionSource;
