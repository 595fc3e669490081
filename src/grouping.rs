// src/grouping.rs
//
// The same physical unit is frequently re-posted under a new listing id, which
// skews any statistics computed downstream. Grouping on physically invariant
// columns and keeping only the smallest id per group collapses those
// re-postings to one canonical record.

use crate::scraper::models::Listing;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Partition listings by the tuple of `group_cols` values and keep, per
/// partition, the member with the numerically smallest id.
///
/// Listings without a usable id cannot be compared and are dropped here,
/// mirroring how a SQL `min(id) ... where id in (...)` treats NULL ids.
/// The result is sorted by id, so running the operation on its own output
/// with the same columns returns it unchanged.
pub fn group_by_properties(
    listings: &[Listing],
    group_cols: &[String],
) -> Result<Vec<Listing>, String> {
    let mut survivors: HashMap<Vec<String>, (u64, &Listing)> = HashMap::new();

    for listing in listings {
        let Some(id) = numeric_id(listing) else {
            continue;
        };
        let key = group_key(listing, group_cols)?;

        match survivors.entry(key) {
            Entry::Occupied(mut entry) => {
                if id < entry.get().0 {
                    entry.insert((id, listing));
                }
            }
            Entry::Vacant(entry) => {
                entry.insert((id, listing));
            }
        }
    }

    let mut grouped: Vec<Listing> = survivors
        .into_values()
        .map(|(_, listing)| listing.clone())
        .collect();
    sort_by_id(&mut grouped);
    Ok(grouped)
}

/// Sort listings by numeric id ascending, ids that don't parse last. This is
/// the deterministic order every exported stage uses.
pub fn sort_by_id(listings: &mut [Listing]) {
    listings.sort_by_key(|listing| match numeric_id(listing) {
        Some(id) => (0, id),
        None => (1, 0),
    });
}

fn numeric_id(listing: &Listing) -> Option<u64> {
    listing.id.as_deref().and_then(|id| id.parse::<u64>().ok())
}

fn group_key(listing: &Listing, group_cols: &[String]) -> Result<Vec<String>, String> {
    group_cols
        .iter()
        .map(|col| column_value(listing, col))
        .collect()
}

fn column_value(listing: &Listing, col: &str) -> Result<String, String> {
    let value = match col {
        "name" => listing.name.clone(),
        "price" => listing.price.to_string(),
        "age" => listing.age.to_string(),
        "line" => listing.line.clone(),
        "station_name" => listing.station_name.clone(),
        "minutes" => listing.minutes.to_string(),
        "layout" => listing.layout.clone(),
        "area" => listing.area.to_string(),
        "address" => listing.address.clone(),
        _ => return Err(format!("unknown group column: {col}")),
    };
    Ok(value)
}
