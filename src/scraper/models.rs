use serde::Serialize;

// Raw listing as read from one property_unit container, all fields still
// source-formatted text. name/price are guaranteed by the extractor; every
// label-derived field is optional because the label row may be absent.
#[derive(Debug, Clone, Serialize)]
pub struct RawListing {
    pub name: String,
    pub price: String,

    pub address: Option<String>,
    pub access: Option<String>,
    pub area: Option<String>,
    pub layout: Option<String>,
    pub yyyymm_construction: Option<String>,

    pub url: Option<String>,
}

// Normalized listing, typed and projected to the fixed column order used by
// every downstream stage. id stays optional: a detail URL without the numeric
// token keeps its row, it just can't survive grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: Option<String>,
    pub name: String,
    pub price: i64,
    pub age: i64,
    pub line: String,
    pub station_name: String,
    pub minutes: i64,
    pub layout: String,
    pub area: f64,
    pub address: String,
    pub url: String,
}

/// A canonical listing with the optional coordinate columns attached.
#[derive(Debug, Clone)]
pub struct GeocodedListing {
    pub listing: Listing,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl GeocodedListing {
    pub fn new(listing: Listing, coordinates: Option<(f64, f64)>) -> Self {
        let (lat, lon) = match coordinates {
            Some((lat, lon)) => (Some(lat), Some(lon)),
            None => (None, None),
        };
        Self { listing, lat, lon }
    }
}
