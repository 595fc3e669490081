// src/geocode/geocoder.rs
use crate::geocode::cache::{CachedCoordinates, GeocodeCache};
use crate::geocode::GeocodeError;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

const GEOCODE_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Capability seam over the external geocoding service, so the lookup logic
/// and its cache behavior can be exercised without the network.
pub trait GeocodeProvider {
    /// Resolve an address. Ok(None) means the provider had no result for it.
    fn geocode(&self, address: &str) -> Result<Option<(f64, f64)>, GeocodeError>;
}

pub struct GoogleMapsGeocoder {
    client: Client,
    api_key: String,
}

impl GoogleMapsGeocoder {
    /// Build a provider for the given API key. A blank key is rejected here,
    /// before any cache or network access can happen.
    pub fn new(api_key: &str) -> Result<Self, GeocodeError> {
        if api_key.trim().is_empty() {
            return Err(GeocodeError::InvalidArgument("API key is empty".into()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl GeocodeProvider for GoogleMapsGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<(f64, f64)>, GeocodeError> {
        let resp = self
            .client
            .get(GEOCODE_ENDPOINT)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;

        let body: GeocodeResponse = resp
            .json()
            .map_err(|e| GeocodeError::MalformedResponse(e.to_string()))?;

        match body.status.as_str() {
            "OK" => {
                let location = body
                    .results
                    .first()
                    .map(|result| &result.geometry.location)
                    .ok_or_else(|| {
                        GeocodeError::MalformedResponse("status OK with no results".into())
                    })?;
                Ok(Some((location.lat, location.lng)))
            }
            "ZERO_RESULTS" => Ok(None),
            status => Err(GeocodeError::Api(format!(
                "{status}: {}",
                body.error_message.unwrap_or_default()
            ))),
        }
    }
}

/// Resolve coordinates for one address, cache first.
///
/// A blank address is an InvalidArgument failure before any cache or network
/// access. When `property_id` is present and cached, the provider is not
/// called at all. A fresh result is written through to the cache (ids only;
/// results without an id are returned but not cached). Every provider failure
/// is logged and collapses to Ok(None); retrying is the caller's business.
pub fn get_coordinates(
    cache: &mut GeocodeCache,
    provider: &dyn GeocodeProvider,
    address: &str,
    property_id: Option<&str>,
) -> Result<Option<(f64, f64)>, GeocodeError> {
    if address.trim().is_empty() {
        return Err(GeocodeError::InvalidArgument("address is empty".into()));
    }

    if let Some(id) = property_id {
        if let Some(cached) = cache.get(id) {
            return Ok(Some((cached.lat, cached.lon)));
        }
    }

    match provider.geocode(address) {
        Ok(Some((lat, lon))) => {
            if let Some(id) = property_id {
                cache.insert(id, CachedCoordinates { lat, lon });
                info!("cached coordinates for id {id}");
            }
            Ok(Some((lat, lon)))
        }
        Ok(None) => Ok(None),
        Err(e) => {
            error!("geocoding failed for address {address}: {e}");
            Ok(None)
        }
    }
}
