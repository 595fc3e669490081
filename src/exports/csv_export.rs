// src/exports/csv_export.rs
//
// Per-stage CSV writers. Each stage lands under data/<case>/<stage>/ with a
// yyyymmdd filename, one file per run day.

use crate::exports::ExportError;
use crate::scraper::models::{GeocodedListing, Listing, RawListing};
use csv::Writer;
use std::fs;
use std::path::Path;

const LAKE_HEADERS: [&str; 8] = [
    "name",
    "price",
    "address",
    "access",
    "area",
    "layout",
    "yyyymm_construction",
    "url",
];

const LISTING_HEADERS: [&str; 11] = [
    "id",
    "name",
    "price",
    "age",
    "line",
    "station_name",
    "minutes",
    "layout",
    "area",
    "address",
    "url",
];

/// Raw listings exactly as scraped, optional fields left empty.
pub fn write_lake_csv(path: &Path, raw_listings: &[RawListing]) -> Result<(), ExportError> {
    let mut writer = open_writer(path)?;

    writer
        .write_record(LAKE_HEADERS)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for raw in raw_listings {
        writer
            .write_record([
                raw.name.as_str(),
                raw.price.as_str(),
                raw.address.as_deref().unwrap_or(""),
                raw.access.as_deref().unwrap_or(""),
                raw.area.as_deref().unwrap_or(""),
                raw.layout.as_deref().unwrap_or(""),
                raw.yyyymm_construction.as_deref().unwrap_or(""),
                raw.url.as_deref().unwrap_or(""),
            ])
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer.flush().map_err(|e| ExportError::Io(e.to_string()))
}

/// Normalized or grouped listings in the fixed projected column order.
pub fn write_listings_csv(path: &Path, listings: &[Listing]) -> Result<(), ExportError> {
    let mut writer = open_writer(path)?;

    writer
        .write_record(LISTING_HEADERS)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for listing in listings {
        writer
            .write_record(listing_record(listing))
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer.flush().map_err(|e| ExportError::Io(e.to_string()))
}

/// Canonical listings with their coordinate columns; unresolved rows keep
/// empty lat/lon cells.
pub fn write_mart_csv(path: &Path, records: &[GeocodedListing]) -> Result<(), ExportError> {
    let mut writer = open_writer(path)?;

    let mut headers: Vec<&str> = LISTING_HEADERS.to_vec();
    headers.extend(["lat", "lon"]);
    writer
        .write_record(&headers)
        .map_err(|e| ExportError::Csv(e.to_string()))?;

    for record in records {
        let mut row = listing_record(&record.listing);
        row.push(record.lat.map(|v| v.to_string()).unwrap_or_default());
        row.push(record.lon.map(|v| v.to_string()).unwrap_or_default());
        writer
            .write_record(&row)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
    }

    writer.flush().map_err(|e| ExportError::Io(e.to_string()))
}

fn listing_record(listing: &Listing) -> Vec<String> {
    vec![
        listing.id.clone().unwrap_or_default(),
        listing.name.clone(),
        listing.price.to_string(),
        listing.age.to_string(),
        listing.line.clone(),
        listing.station_name.clone(),
        listing.minutes.to_string(),
        listing.layout.clone(),
        listing.area.to_string(),
        listing.address.clone(),
        listing.url.clone(),
    ]
}

fn open_writer(path: &Path) -> Result<Writer<fs::File>, ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::Io(e.to_string()))?;
    }
    Writer::from_path(path).map_err(|e| ExportError::Csv(e.to_string()))
}
