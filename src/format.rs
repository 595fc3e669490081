// src/format.rs
//
// Turns raw scraped text into typed listings. A record that fails any of the
// price/minutes/area/age rules is dropped; a missing listing id alone is kept
// as None so the row still reaches the formatted output.

use crate::scraper::models::{Listing, RawListing};
use regex::Regex;
use tracing::debug;

/// Normalize a batch of raw listings. `current_year` feeds the building-age
/// calculation and is passed in so the rule stays deterministic under test.
pub fn format_listings(raw_listings: &[RawListing], current_year: i32) -> Vec<Listing> {
    let formatted: Vec<Listing> = raw_listings
        .iter()
        .filter_map(|raw| format_listing(raw, current_year))
        .collect();

    debug!(
        "formatted {} of {} raw listings",
        formatted.len(),
        raw_listings.len()
    );
    formatted
}

fn format_listing(raw: &RawListing, current_year: i32) -> Option<Listing> {
    let price = parse_price(&raw.price);

    let access = raw.access.as_deref().unwrap_or("");
    let minutes = parse_walk_minutes(access)?;
    let station_name = parse_station_name(access);
    let line = parse_line(access);

    let area = parse_area_sqm(raw.area.as_deref()?)?;
    let age = parse_age_years(raw.yyyymm_construction.as_deref()?, current_year)?;

    let url = raw.url.clone().unwrap_or_default();
    let id = extract_listing_id(&url);

    Some(Listing {
        id,
        name: raw.name.clone(),
        price,
        age,
        line,
        station_name,
        minutes,
        layout: raw.layout.clone().unwrap_or_default(),
        area,
        address: raw.address.clone().unwrap_or_default(),
        url,
    })
}

/// Price in 万 units: an optional 億 component counts 10,000-fold and adds to
/// the optional 万 component. "1億2000万円" -> 22000, "3500万円" -> 3500.
/// Neither component present yields 0.
pub fn parse_price(price_text: &str) -> i64 {
    let price_text = price_text.replace('円', "");

    let oku_regex = Regex::new(r"(\d+(?:\.\d+)?)億").unwrap();
    let oku = capture_f64(&oku_regex, &price_text).unwrap_or(0.0);

    let man_regex = Regex::new(r"(\d+(?:\.\d+)?)万").unwrap();
    let man = capture_f64(&man_regex, &price_text).unwrap_or(0.0);

    (oku * 10_000.0 + man) as i64
}

/// Station is the substring inside the first 「」 pair; absent brackets leave
/// it empty without dropping the record.
pub fn parse_station_name(access_text: &str) -> String {
    let station_regex = Regex::new(r"「(.*?)」").unwrap();
    station_regex
        .captures(access_text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// Line is everything before the first 「 (the whole text when there is none).
pub fn parse_line(access_text: &str) -> String {
    access_text
        .split('「')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Walking minutes between 徒歩 and 分; required.
pub fn parse_walk_minutes(access_text: &str) -> Option<i64> {
    let minutes_regex = Regex::new(r"徒歩(.*?)分").unwrap();
    minutes_regex
        .captures(access_text)
        .and_then(|caps| caps[1].trim().parse::<i64>().ok())
}

/// Leading decimal number before the literal m2 token; required.
pub fn parse_area_sqm(area_text: &str) -> Option<f64> {
    let area_regex = Regex::new(r"(\d+(?:\.\d+)?)m2").unwrap();
    capture_f64(&area_regex, area_text)
}

/// Construction text must be exactly "<year>年<month>月"; age is the current
/// calendar year minus the construction year. Required.
pub fn parse_age_years(construction_text: &str, current_year: i32) -> Option<i64> {
    let construction_regex = Regex::new(r"^(\d{4})年(\d{1,2})月$").unwrap();
    let caps = construction_regex.captures(construction_text.trim())?;

    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }

    Some(i64::from(current_year - year))
}

/// Listing id is the numeric token in the detail URL, e.g. ".../nc_12345678/".
pub fn extract_listing_id(url: &str) -> Option<String> {
    let id_regex = Regex::new(r"nc_(\d+)/").unwrap();
    id_regex.captures(url).map(|caps| caps[1].to_string())
}

fn capture_f64(regex: &Regex, text: &str) -> Option<f64> {
    regex
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}
