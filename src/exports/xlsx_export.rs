use crate::exports::ExportError;
use crate::scraper::models::GeocodedListing;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::Path;

/// Write the canonical listings to a spreadsheet file, one row per record,
/// with an updated-at stamp column. This replaces a hosted-sheet upload with
/// a local artifact the user can open or sync themselves.
pub fn export_listings_xlsx(
    path: &Path,
    records: &[GeocodedListing],
    updated_at: &str,
) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Headers
    let headers = [
        "ID",
        "Name",
        "Price (万円)",
        "Age",
        "Line",
        "Station",
        "Minutes",
        "Layout",
        "Area (m2)",
        "Address",
        "URL",
        "Lat",
        "Lon",
        "Updated At",
    ];

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(|e| {
                ExportError::Xlsx(format!("Failed to write header '{}': {}", header, e))
            })?;
    }

    // Rows
    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;
        let listing = &record.listing;

        let id = listing.id.as_deref().unwrap_or("");
        worksheet
            .write_string(r, 0, id)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write id: {}", e)))?;

        worksheet
            .write_string(r, 1, &listing.name)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write name: {}", e)))?;

        worksheet
            .write_number(r, 2, listing.price as f64)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write price: {}", e)))?;

        worksheet
            .write_number(r, 3, listing.age as f64)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write age: {}", e)))?;

        worksheet
            .write_string(r, 4, &listing.line)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write line: {}", e)))?;

        worksheet
            .write_string(r, 5, &listing.station_name)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write station: {}", e)))?;

        worksheet
            .write_number(r, 6, listing.minutes as f64)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write minutes: {}", e)))?;

        worksheet
            .write_string(r, 7, &listing.layout)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write layout: {}", e)))?;

        worksheet
            .write_number(r, 8, listing.area)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write area: {}", e)))?;

        worksheet
            .write_string(r, 9, &listing.address)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write address: {}", e)))?;

        worksheet
            .write_string(r, 10, &listing.url)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write url: {}", e)))?;

        if let Some(lat) = record.lat {
            worksheet
                .write_number(r, 11, lat)
                .map_err(|e| ExportError::Xlsx(format!("Failed to write lat: {}", e)))?;
        }

        if let Some(lon) = record.lon {
            worksheet
                .write_number(r, 12, lon)
                .map_err(|e| ExportError::Xlsx(format!("Failed to write lon: {}", e)))?;
        }

        worksheet
            .write_string(r, 13, updated_at)
            .map_err(|e| ExportError::Xlsx(format!("Failed to write updated_at: {}", e)))?;
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ExportError::Io(e.to_string()))?;
    }

    workbook
        .save(path)
        .map_err(|e| ExportError::Xlsx(format!("Failed to save workbook: {}", e)))?;

    Ok(())
}
