mod cache;
mod geocode_error;
mod geocoder;

pub use cache::{CachedCoordinates, GeocodeCache};
pub use geocode_error::GeocodeError;
pub use geocoder::{get_coordinates, GeocodeProvider, GoogleMapsGeocoder};
